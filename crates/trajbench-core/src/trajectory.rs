use crate::{ArtifactError, ArtifactResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub timestamp: f64,
    pub position: [f64; 3],
    /// Unit quaternion, `[qx, qy, qz, qw]`.
    pub orientation: [f64; 4],
}

/// An ordered sequence of timestamped 3D poses.
///
/// The pipeline treats trajectories as opaque payloads; only the pose count and positions are
/// inspected (endpoints for ground-truth comparison, full XY path for plotting).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Trajectory {
    poses: Vec<Pose>,
}

const IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

impl Trajectory {
    pub fn new(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    /// Builds a trajectory from bare positions; timestamps are the pose indices.
    pub fn from_positions(positions: impl IntoIterator<Item = [f64; 3]>) -> Self {
        let poses = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Pose {
                timestamp: i as f64,
                position,
                orientation: IDENTITY,
            })
            .collect();
        Self { poses }
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    pub fn num_poses(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.poses.iter().map(|p| p.position)
    }

    pub fn start(&self) -> Option<[f64; 3]> {
        self.poses.first().map(|p| p.position)
    }

    pub fn end(&self) -> Option<[f64; 3]> {
        self.poses.last().map(|p| p.position)
    }

    /// Cheap equality check used to flag diverging ground truths: same pose count and endpoints
    /// within `tolerance` on every axis.
    pub fn same_extent(&self, other: &Trajectory, tolerance: f64) -> bool {
        fn close(a: Option<[f64; 3]>, b: Option<[f64; 3]>, tol: f64) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol),
                (None, None) => true,
                _ => false,
            }
        }
        self.num_poses() == other.num_poses()
            && close(self.start(), other.start(), tolerance)
            && close(self.end(), other.end(), tolerance)
    }

    /// Parses TUM text: `timestamp x y z qx qy qz qw` per line. Blank lines and `#` comments are
    /// ignored; values may be separated by whitespace or commas.
    pub fn parse_tum(name: &str, text: &str) -> ArtifactResult<Self> {
        let mut poses = Vec::new();
        for (idx, values) in numeric_lines(name, text) {
            let values = values?;
            if values.len() != 8 {
                return Err(parse_error(
                    name,
                    idx,
                    format!("expected 8 values, found {}", values.len()),
                ));
            }
            poses.push(Pose {
                timestamp: values[0],
                position: [values[1], values[2], values[3]],
                orientation: [values[4], values[5], values[6], values[7]],
            });
        }
        Ok(Self { poses })
    }

    /// Parses KITTI text: a row-major 3x4 pose matrix (12 values) per line. KITTI carries no
    /// timestamps, so the line index is used.
    pub fn parse_kitti(name: &str, text: &str) -> ArtifactResult<Self> {
        let mut poses = Vec::new();
        for (idx, values) in numeric_lines(name, text) {
            let m = values?;
            if m.len() != 12 {
                return Err(parse_error(
                    name,
                    idx,
                    format!("expected 12 values, found {}", m.len()),
                ));
            }
            let rotation = [[m[0], m[1], m[2]], [m[4], m[5], m[6]], [m[8], m[9], m[10]]];
            poses.push(Pose {
                timestamp: poses.len() as f64,
                position: [m[3], m[7], m[11]],
                orientation: quaternion_from_rotation(&rotation),
            });
        }
        Ok(Self { poses })
    }
}

fn parse_error(name: &str, line: usize, message: String) -> ArtifactError {
    ArtifactError::TrajectoryParse {
        name: name.to_string(),
        line,
        message,
    }
}

/// Yields `(1-based line number, parsed values)` for every non-empty, non-comment line.
fn numeric_lines<'a>(
    name: &'a str,
    text: &'a str,
) -> impl Iterator<Item = (usize, ArtifactResult<Vec<f64>>)> + 'a {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(move |(idx, line)| {
            let values = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|tok| !tok.is_empty())
                .map(|tok| {
                    tok.parse::<f64>()
                        .map_err(|_| parse_error(name, idx, format!("invalid number `{tok}`")))
                })
                .collect::<ArtifactResult<Vec<f64>>>();
            (idx, values)
        })
}

fn quaternion_from_rotation(r: &[[f64; 3]; 3]) -> [f64; 4] {
    let trace = r[0][0] + r[1][1] + r[2][2];
    let (x, y, z, w) = if trace > 0.0 {
        let s = (trace + 1.0).sqrt() * 2.0;
        (
            (r[2][1] - r[1][2]) / s,
            (r[0][2] - r[2][0]) / s,
            (r[1][0] - r[0][1]) / s,
            0.25 * s,
        )
    } else if r[0][0] > r[1][1] && r[0][0] > r[2][2] {
        let s = (1.0 + r[0][0] - r[1][1] - r[2][2]).sqrt() * 2.0;
        (
            0.25 * s,
            (r[0][1] + r[1][0]) / s,
            (r[0][2] + r[2][0]) / s,
            (r[2][1] - r[1][2]) / s,
        )
    } else if r[1][1] > r[2][2] {
        let s = (1.0 + r[1][1] - r[0][0] - r[2][2]).sqrt() * 2.0;
        (
            (r[0][1] + r[1][0]) / s,
            0.25 * s,
            (r[1][2] + r[2][1]) / s,
            (r[0][2] - r[2][0]) / s,
        )
    } else {
        let s = (1.0 + r[2][2] - r[0][0] - r[1][1]).sqrt() * 2.0;
        (
            (r[0][2] + r[2][0]) / s,
            (r[1][2] + r[2][1]) / s,
            0.25 * s,
            (r[1][0] - r[0][1]) / s,
        )
    };
    [x, y, z, w]
}
