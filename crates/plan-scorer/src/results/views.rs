use crate::proposals::ProposalId;
use crate::scoring::NormalizationStrategy;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScoreEntry {
    pub category: String,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTableRow {
    pub rank: usize,
    pub proposal_id: ProposalId,
    pub name: String,
    pub total: f64,
    pub relative_score: f64,
    pub completion_rate: u8,
    pub categories: Vec<CategoryScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub axis: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub proposal_id: ProposalId,
    pub name: String,
    pub points: Vec<RadarPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub indicator: String,
    pub label: String,
    pub category: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapRow {
    pub proposal_id: ProposalId,
    pub name: String,
    pub cells: Vec<HeatmapCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub strategy: NormalizationStrategy,
    pub valid_configuration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader: Option<ProposalId>,
    pub table: Vec<ResultTableRow>,
    pub radar: Vec<RadarSeries>,
    pub heatmap: Vec<HeatmapRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<ProposalId>,
}
