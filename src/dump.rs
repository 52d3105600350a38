//! Serializable mirror of routing results for debug tooling and the CLI.

use serde::Serialize;

use crate::geometry::Point;
use crate::route::{RouteDiagnostics, RouteResult};

#[derive(Debug, Serialize)]
pub struct RouteDump {
    pub connectors: Vec<ConnectorDump>,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub index: usize,
    pub path: Vec<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsDump>,
}

#[derive(Debug, Serialize)]
pub struct DiagnosticsDump {
    pub shape_margin: f32,
    pub v_rulers: Vec<f32>,
    pub h_rulers: Vec<f32>,
    pub spots: Vec<[f32; 2]>,
    pub grid: Vec<[f32; 4]>,
    pub connections: Vec<[[f32; 2]; 2]>,
}

fn point(p: Point) -> [f32; 2] {
    [p.x, p.y]
}

impl DiagnosticsDump {
    fn from_diagnostics(diagnostics: &RouteDiagnostics) -> Self {
        Self {
            shape_margin: diagnostics.shape_margin,
            v_rulers: diagnostics.v_rulers.clone(),
            h_rulers: diagnostics.h_rulers.clone(),
            spots: diagnostics.spots.iter().copied().map(point).collect(),
            grid: diagnostics
                .grid
                .iter()
                .map(|r| [r.left, r.top, r.width, r.height])
                .collect(),
            connections: diagnostics
                .connections
                .iter()
                .map(|(a, b)| [point(*a), point(*b)])
                .collect(),
        }
    }
}

impl RouteDump {
    pub fn from_results(results: &[RouteResult], include_diagnostics: bool) -> Self {
        let connectors = results
            .iter()
            .enumerate()
            .map(|(index, result)| ConnectorDump {
                index,
                path: result.path.iter().copied().map(point).collect(),
                diagnostics: include_diagnostics
                    .then(|| DiagnosticsDump::from_diagnostics(&result.diagnostics)),
            })
            .collect();
        Self { connectors }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
