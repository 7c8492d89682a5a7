// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Plot Preparation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Turns collected fields into renderer-ready data: coordinates, values,
//! axis labels and titles. Drawing itself happens elsewhere.

use crate::collect::{Field1D, Field2D, LineDirection, Plane};
use crate::labels::AxisLabels;
use celma_core::mesh::{degrees, perp_grid};
use celma_types::config::{PlotConfig, Processing};
use celma_types::error::{CelmaError, CelmaResult};
use ndarray::{Array1, Array2, Array3, Axis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line(LineDirection),
    Contour(Plane),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotData {
    /// One line per time frame, `values` is `[t, s]`.
    Line {
        abscissa: Array1<f64>,
        values: Array2<f64>,
    },
    /// One filled contour per time frame on the `(x, y)` grid, `values` is
    /// `[t, a, b]` and both grids are `[a, b]`.
    Contour {
        x: Array2<f64>,
        y: Array2<f64>,
        values: Array3<f64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedPlot {
    pub kind: PlotKind,
    pub data: PlotData,
    pub x_label: String,
    pub y_label: String,
    /// Ordinate of lines, colour bar of contours.
    pub var_label: String,
    /// Fixed coordinates, shared by every frame.
    pub title: String,
    /// Time of each frame.
    pub frame_titles: Vec<String>,
}

/// A collected field that can be prepared for plotting.
pub trait Plottable {
    fn kind(&self) -> PlotKind;

    fn prepare(&self, config: &PlotConfig) -> CelmaResult<PreparedPlot>;
}

fn join_title(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("   ")
}

fn frame_titles(labels: &AxisLabels, time: &Array1<f64>, precision: usize) -> Vec<String> {
    time.iter().map(|&t| labels.t.constant(t, precision)).collect()
}

fn decorate(name: &str, processing: Option<Processing>) -> String {
    match processing {
        None => name.to_string(),
        Some(Processing::PolAvg) => format!(r"\langle {name}\rangle_\theta"),
        Some(Processing::PolAndTimeAvg) => {
            format!(r"\langle\langle {name}\rangle_\theta\rangle_t")
        }
        Some(Processing::PolAvgFluct) => format!(r"\widetilde{{{name}}}"),
        Some(Processing::PolAndTimeAvgFluct) => {
            format!(r"{name} - \langle\langle {name}\rangle_\theta\rangle_t")
        }
    }
}

/// `ij`-indexed grids of two coordinate vectors.
fn meshgrid(a: &Array1<f64>, b: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (a.len(), b.len());
    (
        Array2::from_shape_fn(shape, |(i, _)| a[i]),
        Array2::from_shape_fn(shape, |(_, j)| b[j]),
    )
}

fn check_grid(values: &Array3<f64>, x: &Array2<f64>) -> CelmaResult<()> {
    if values.len_of(Axis(1)) != x.nrows() || values.len_of(Axis(2)) != x.ncols() {
        return Err(CelmaError::ShapeMismatch(format!(
            "contour values {:?} do not match grid {:?}",
            values.shape(),
            x.shape()
        )));
    }
    Ok(())
}

impl Plottable for Field1D {
    fn kind(&self) -> PlotKind {
        PlotKind::Line(self.mode)
    }

    fn prepare(&self, config: &PlotConfig) -> CelmaResult<PreparedPlot> {
        if self.abscissa.len() != self.values.ncols() {
            return Err(CelmaError::ShapeMismatch(format!(
                "{} abscissa points for {} values per frame",
                self.abscissa.len(),
                self.values.ncols()
            )));
        }
        let labels = AxisLabels::new(&self.units);
        let p = config.precision;
        let theta = self.theta_pos.map(|th| labels.theta_constant(th));

        let (x_label, title) = match self.mode {
            LineDirection::Radial => (
                labels.rho.label.clone(),
                join_title(&[theta, self.z_pos.map(|z| labels.z.constant(z, p))]),
            ),
            LineDirection::Parallel => (
                labels.z.label.clone(),
                join_title(&[self.rho_pos.map(|r| labels.rho.constant(r, p)), theta]),
            ),
        };

        let display = decorate(config.var_plot_name(&self.var_name), self.processing);
        let var_label = labels.quantity_label(&display, &self.var_name, &self.units);

        Ok(PreparedPlot {
            kind: self.kind(),
            data: PlotData::Line {
                abscissa: self.abscissa.clone(),
                values: self.values.clone(),
            },
            x_label,
            y_label: var_label.clone(),
            var_label,
            title,
            frame_titles: frame_titles(&labels, &self.time, p),
        })
    }
}

impl Plottable for Field2D {
    fn kind(&self) -> PlotKind {
        PlotKind::Contour(self.plane)
    }

    fn prepare(&self, config: &PlotConfig) -> CelmaResult<PreparedPlot> {
        let labels = AxisLabels::new(&self.units);
        let p = config.precision;

        let (x, y, x_label, y_label, title) = match self.plane {
            Plane::Perp => {
                // first is ρ, second the closed θ ring
                let (x, y) = perp_grid(&self.first, &self.second);
                let title = join_title(&[self.z_pos.map(|z| labels.z.constant(z, p))]);
                (x, y, labels.rho.label.clone(), labels.rho.label.clone(), title)
            }
            Plane::Par => {
                let (x, y) = meshgrid(&self.first, &self.second);
                let title = join_title(&[self.theta_pos.map(|th| labels.theta_constant(th))]);
                (x, y, labels.rho.label.clone(), labels.z.label.clone(), title)
            }
            Plane::Pol => {
                let (x, y) = meshgrid(&degrees(&self.first), &self.second);
                let title = join_title(&[self.rho_pos.map(|r| labels.rho.constant(r, p))]);
                (x, y, labels.theta_label(), labels.z.label.clone(), title)
            }
        };
        check_grid(&self.values, &x)?;

        let processing = self.fluct.then_some(Processing::PolAvgFluct);
        let display = decorate(config.var_plot_name(&self.var_name), processing);

        Ok(PreparedPlot {
            kind: self.kind(),
            data: PlotData::Contour {
                x,
                y,
                values: self.values.clone(),
            },
            x_label,
            y_label,
            var_label: labels.quantity_label(&display, &self.var_name, &self.units),
            title,
            frame_titles: frame_titles(&labels, &self.time, p),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celma_core::units::UnitsConverter;
    use ndarray::array;
    use std::f64::consts::PI;

    fn radial_field() -> Field1D {
        Field1D {
            var_name: "n".into(),
            mode: LineDirection::Radial,
            processing: Some(Processing::PolAvg),
            values: Array2::from_shape_fn((2, 3), |(t, s)| (t * 10 + s) as f64),
            abscissa: array![0.5, 1.5, 2.5],
            time: array![0.0, 25.0],
            rho_pos: None,
            z_pos: Some(12.5),
            theta_pos: None,
            units: UnitsConverter::normalized(),
        }
    }

    #[test]
    fn test_line_preparation() {
        let plot = radial_field().prepare(&PlotConfig::default()).unwrap();
        assert_eq!(plot.kind, PlotKind::Line(LineDirection::Radial));
        assert_eq!(plot.x_label, r"$\rho/\rho_s$");
        assert_eq!(plot.var_label, r"$\langle n\rangle_\theta/n_0$");
        assert_eq!(plot.title, r"$z/\rho_s$ $=$ $12.5$");
        assert_eq!(
            plot.frame_titles,
            vec![
                r"$t\omega_{ci}$ $=$ $0$".to_string(),
                r"$t\omega_{ci}$ $=$ $25$".to_string()
            ]
        );
        match plot.data {
            PlotData::Line { abscissa, values } => {
                assert_eq!(abscissa.len(), 3);
                assert_eq!(values[[1, 2]], 12.0);
            }
            other => panic!("expected line data, got {other:?}"),
        }
    }

    #[test]
    fn test_parallel_title_with_theta() {
        let mut field = radial_field();
        field.mode = LineDirection::Parallel;
        field.processing = None;
        field.z_pos = None;
        field.rho_pos = Some(1.0);
        field.theta_pos = Some(PI);
        let plot = field.prepare(&PlotConfig::default()).unwrap();
        assert_eq!(plot.x_label, r"$z/\rho_s$");
        assert_eq!(plot.title, r"$\rho/\rho_s$ $=$ $1$   $\theta=180^{\circ}$");
        assert_eq!(plot.var_label, "$n/n_0$");
    }

    #[test]
    fn test_line_shape_mismatch() {
        let mut field = radial_field();
        field.abscissa = array![0.5, 1.5];
        assert!(field.prepare(&PlotConfig::default()).is_err());
    }

    fn perp_field() -> Field2D {
        let theta = Array1::from_iter((0..5).map(|k| k as f64 * PI / 2.0));
        Field2D {
            var_name: "phi".into(),
            plane: Plane::Perp,
            fluct: true,
            values: Array3::zeros((1, 2, 5)),
            first: array![1.0, 2.0],
            second: theta,
            time: array![3.0],
            rho_pos: None,
            theta_pos: None,
            z_pos: Some(4.0),
            units: UnitsConverter::normalized(),
        }
    }

    #[test]
    fn test_perp_contour_is_cartesian() {
        let plot = perp_field().prepare(&PlotConfig::default()).unwrap();
        assert_eq!(plot.kind, PlotKind::Contour(Plane::Perp));
        assert_eq!(plot.var_label, r"$\widetilde{\phi} q/T_{e,0}$");
        match plot.data {
            PlotData::Contour { x, y, .. } => {
                assert_eq!(x.shape(), &[2, 5]);
                assert!((x[[1, 0]] - 2.0).abs() < 1e-12);
                assert!((y[[1, 1]] - 2.0).abs() < 1e-12);
                assert!((x[[1, 2]] + 2.0).abs() < 1e-12);
                assert!((x[[1, 4]] - x[[1, 0]]).abs() < 1e-12);
            }
            other => panic!("expected contour data, got {other:?}"),
        }
    }

    #[test]
    fn test_pol_contour_in_degrees() {
        let mut field = perp_field();
        field.plane = Plane::Pol;
        field.fluct = false;
        field.first = Array1::from_iter((0..5).map(|k| k as f64 * PI / 2.0));
        field.second = array![1.0, 3.0];
        field.values = Array3::zeros((1, 5, 2));
        field.rho_pos = Some(0.75);
        field.z_pos = None;
        let plot = field.prepare(&PlotConfig::default()).unwrap();
        assert_eq!(plot.x_label, r"$\theta$ $[^{\circ}]$");
        assert_eq!(plot.title, r"$\rho/\rho_s$ $=$ $0.75$");
        match plot.data {
            PlotData::Contour { x, y, .. } => {
                assert!((x[[2, 0]] - 180.0).abs() < 1e-9);
                assert_eq!(y[[2, 1]], 3.0);
            }
            other => panic!("expected contour data, got {other:?}"),
        }
    }

    #[test]
    fn test_contour_grid_mismatch() {
        let mut field = perp_field();
        field.values = Array3::zeros((1, 3, 5));
        assert!(matches!(
            field.prepare(&PlotConfig::default()),
            Err(CelmaError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_polymorphic_preparation() {
        let fields: Vec<Box<dyn Plottable>> = vec![Box::new(radial_field()), Box::new(perp_field())];
        let kinds: Vec<PlotKind> = fields.iter().map(|f| f.kind()).collect();
        assert_eq!(
            kinds,
            vec![PlotKind::Line(LineDirection::Radial), PlotKind::Contour(Plane::Perp)]
        );
        for f in &fields {
            assert!(f.prepare(&PlotConfig::default()).is_ok());
        }
    }
}
