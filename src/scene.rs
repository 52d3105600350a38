//! Declarative scene input: shapes by id plus connectors referencing
//! them. This is the CLI- and test-facing mirror of [`RouteOptions`];
//! the view layer of a host application would construct options directly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;
use crate::route::{ConnectorEndpoint, RouteOptions, Side};

fn default_anchor_distance() -> f32 {
    0.5
}

fn default_shape_margin() -> f32 {
    10.0
}

fn default_global_bounds_margin() -> f32 {
    20.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneShape {
    pub id: String,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SceneShape {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEndpoint {
    /// Id of the shape this endpoint attaches to.
    pub shape: String,
    pub side: Side,
    #[serde(default = "default_anchor_distance")]
    pub distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConnector {
    pub source: SceneEndpoint,
    pub target: SceneEndpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub shapes: Vec<SceneShape>,
    pub connectors: Vec<SceneConnector>,
    #[serde(default = "default_shape_margin")]
    pub shape_margin: f32,
    #[serde(default = "default_global_bounds_margin")]
    pub global_bounds_margin: f32,
    /// Canvas bound the routing area is clipped to. When omitted, a bound
    /// wide enough to never clip is derived from the shapes.
    #[serde(default)]
    pub global_bounds: Option<Rect>,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene is not valid JSON: {0}")]
    Parse(#[from] json5::Error),
    #[error("connector {connector} references unknown shape `{shape}`")]
    UnknownShape { connector: usize, shape: String },
}

impl Scene {
    /// Parses a scene from JSON (json5, so hand-written files may carry
    /// comments and trailing commas).
    pub fn parse(text: &str) -> Result<Scene, SceneError> {
        Ok(json5::from_str(text)?)
    }

    /// Resolves every connector into routing options.
    pub fn route_options(&self) -> Result<Vec<RouteOptions>, SceneError> {
        let global_bounds = self.global_bounds.unwrap_or_else(|| self.fallback_bounds());
        self.connectors
            .iter()
            .enumerate()
            .map(|(index, connector)| {
                Ok(RouteOptions {
                    source: self.resolve(index, &connector.source)?,
                    target: self.resolve(index, &connector.target)?,
                    shape_margin: self.shape_margin,
                    global_bounds_margin: self.global_bounds_margin,
                    global_bounds,
                })
            })
            .collect()
    }

    fn resolve(&self, connector: usize, endpoint: &SceneEndpoint) -> Result<ConnectorEndpoint, SceneError> {
        let shape = self
            .shapes
            .iter()
            .find(|s| s.id == endpoint.shape)
            .ok_or_else(|| SceneError::UnknownShape {
                connector,
                shape: endpoint.shape.clone(),
            })?;
        Ok(ConnectorEndpoint {
            shape: shape.rect(),
            side: endpoint.side,
            distance: endpoint.distance,
        })
    }

    /// Union of every shape, padded by both margins so clipping never
    /// bites when the scene does not bound the canvas itself.
    fn fallback_bounds(&self) -> Rect {
        let mut shapes = self.shapes.iter();
        let Some(first) = shapes.next() else {
            return Rect::default();
        };
        let pad = self.shape_margin + self.global_bounds_margin + 1.0;
        shapes
            .fold(first.rect(), |acc, s| acc.union(&s.rect()))
            .inflate(pad, pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r#"{
        // two boxes, one connector
        shapes: [
            { id: "a", left: 0, top: 0, width: 40, height: 40 },
            { id: "b", left: 200, top: 0, width: 40, height: 40 },
        ],
        connectors: [
            { source: { shape: "a", side: "right" }, target: { shape: "b", side: "left" } },
        ],
    }"#;

    #[test]
    fn parses_json5_with_defaults() {
        let scene = Scene::parse(SCENE).unwrap();
        assert_eq!(scene.shapes.len(), 2);
        assert_eq!(scene.shape_margin, 10.0);
        assert_eq!(scene.global_bounds_margin, 20.0);
        assert_eq!(scene.connectors[0].source.distance, 0.5);
    }

    #[test]
    fn resolves_route_options() {
        let scene = Scene::parse(SCENE).unwrap();
        let options = scene.route_options().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].source.shape, Rect::new(0.0, 0.0, 40.0, 40.0));
        assert_eq!(options[0].source.side, Side::Right);
        // The fallback bound covers both shapes with margin to spare.
        assert!(options[0].global_bounds.left < -20.0);
        assert!(options[0].global_bounds.right() > 260.0);
    }

    #[test]
    fn unknown_shape_is_reported_with_its_connector() {
        let mut scene = Scene::parse(SCENE).unwrap();
        scene.connectors[0].target.shape = "ghost".into();
        let err = scene.route_options().unwrap_err();
        match err {
            SceneError::UnknownShape { connector, shape } => {
                assert_eq!(connector, 0);
                assert_eq!(shape, "ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
