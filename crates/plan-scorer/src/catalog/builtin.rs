use super::{Category, Indicator};

const CATEGORIES: [(&str, &str); 5] = [
    ("land_use", "Land Use & Density"),
    ("mobility", "Transport & Mobility"),
    ("environment", "Green & Environment"),
    ("community", "Community & Housing"),
    ("economy", "Economic Viability"),
];

// id, name, unit, category, lower_is_better, default_weight, icon, description
type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    bool,
    f64,
    &'static str,
    &'static str,
);

const INDICATORS: [Row; 14] = [
    (
        "gross_floor_area",
        "Gross floor area",
        "m²",
        "land_use",
        false,
        60.0,
        "building",
        "Total above-ground floor area delivered by the scheme",
    ),
    (
        "plot_ratio",
        "Plot ratio",
        "",
        "land_use",
        false,
        50.0,
        "layers",
        "Gross floor area divided by site area",
    ),
    (
        "site_coverage",
        "Site coverage",
        "%",
        "land_use",
        true,
        40.0,
        "grid",
        "Share of the site covered by building footprints",
    ),
    (
        "transit_distance",
        "Distance to transit stop",
        "m",
        "mobility",
        true,
        70.0,
        "bus",
        "Walking distance from the main entrance to the nearest public transit stop",
    ),
    (
        "parking_spaces",
        "Parking spaces",
        "spaces",
        "mobility",
        false,
        40.0,
        "car",
        "Number of vehicle parking spaces provided",
    ),
    (
        "bicycle_parking",
        "Bicycle parking",
        "spaces",
        "mobility",
        false,
        30.0,
        "bike",
        "Number of secure bicycle parking spaces",
    ),
    (
        "green_space_ratio",
        "Green space ratio",
        "%",
        "environment",
        false,
        80.0,
        "tree",
        "Share of the site given to planted open space",
    ),
    (
        "energy_use_intensity",
        "Energy use intensity",
        "kWh/m²·a",
        "environment",
        true,
        60.0,
        "bolt",
        "Modelled annual operational energy per unit floor area",
    ),
    (
        "embodied_carbon",
        "Embodied carbon",
        "kgCO₂e/m²",
        "environment",
        true,
        50.0,
        "leaf",
        "Upfront embodied carbon of structure and envelope",
    ),
    (
        "affordable_housing_ratio",
        "Affordable housing ratio",
        "%",
        "community",
        false,
        70.0,
        "home",
        "Share of dwellings offered below market rent",
    ),
    (
        "public_facility_area",
        "Public facility area",
        "m²",
        "community",
        false,
        50.0,
        "users",
        "Floor area reserved for schools, clinics and community rooms",
    ),
    (
        "construction_cost",
        "Construction cost",
        "million CNY",
        "economy",
        true,
        70.0,
        "coins",
        "Estimated total construction cost",
    ),
    (
        "commercial_area",
        "Commercial area",
        "m²",
        "economy",
        false,
        40.0,
        "store",
        "Lettable retail and office floor area",
    ),
    (
        "construction_period",
        "Construction period",
        "months",
        "economy",
        true,
        30.0,
        "clock",
        "Planned duration from groundbreaking to handover",
    ),
];

pub(super) fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(id, label)| Category {
            id: (*id).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

pub(super) fn indicators() -> Vec<Indicator> {
    INDICATORS
        .iter()
        .map(
            |(id, name, unit, category, lower_is_better, default_weight, icon, description)| {
                Indicator {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    unit: (*unit).to_string(),
                    description: (*description).to_string(),
                    icon: (*icon).to_string(),
                    category: (*category).to_string(),
                    lower_is_better: *lower_is_better,
                    default_weight: *default_weight,
                    custom: false,
                }
            },
        )
        .collect()
}
