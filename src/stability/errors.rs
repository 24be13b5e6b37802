// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
use crate::Utils::plots::PlotError;
use std::fmt;

/// Error types of the stability explorer
#[derive(Debug)]
pub enum StabilityError {
    /// a parameter required by the scheme is absent from the mapping
    MissingParameter { scheme: String, key: String },
    /// the control panel knows no parameter with this name
    UnknownParameter(String),
    UnknownScheme(String),
    /// number of moments differs from the number of velocities
    DimensionMismatch { moments: usize, velocities: usize },
    /// moment matrix could not be inverted
    SingularMomentMatrix { scheme: String, determinant: f64 },
    /// a moment polynomial still has free variables after substitution
    UnboundSymbol { moment: String, variables: Vec<String> },
    /// Schur decomposition of G(xi) failed
    EigenDecomposition { wavenumber: f64 },
    NonFiniteEigenvalue { wavenumber: f64 },
    InvalidSampleCount(usize),
    Config(String),
    Plot(PlotError),
    Io(std::io::Error),
    Csv(csv::Error),
}

impl fmt::Display for StabilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StabilityError::MissingParameter { scheme, key } => {
                write!(f, "Scheme {} requires parameter '{}'", scheme, key)
            }
            StabilityError::UnknownParameter(name) => write!(f, "Unknown parameter '{}'", name),
            StabilityError::UnknownScheme(name) => write!(f, "Unknown scheme '{}'", name),
            StabilityError::DimensionMismatch { moments, velocities } => write!(
                f,
                "Scheme declares {} moments for {} velocities",
                moments, velocities
            ),
            StabilityError::SingularMomentMatrix { scheme, determinant } => write!(
                f,
                "Moment matrix of scheme {} is singular (determinant = {:e})",
                scheme, determinant
            ),
            StabilityError::UnboundSymbol { moment, variables } => write!(
                f,
                "Moment {} cannot be evaluated: unbound variables {:?}",
                moment, variables
            ),
            StabilityError::EigenDecomposition { wavenumber } => write!(
                f,
                "Eigenvalue computation did not converge for xi = {}",
                wavenumber
            ),
            StabilityError::NonFiniteEigenvalue { wavenumber } => {
                write!(f, "Non-finite eigenvalue for xi = {}", wavenumber)
            }
            StabilityError::InvalidSampleCount(n) => {
                write!(f, "Number of wavenumber samples must be positive, got {}", n)
            }
            StabilityError::Config(msg) => write!(f, "Configuration error: {}", msg),
            StabilityError::Plot(err) => write!(f, "Plot error: {}", err),
            StabilityError::Io(err) => write!(f, "IO error: {}", err),
            StabilityError::Csv(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl std::error::Error for StabilityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StabilityError::Plot(err) => Some(err),
            StabilityError::Io(err) => Some(err),
            StabilityError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PlotError> for StabilityError {
    fn from(err: PlotError) -> Self {
        StabilityError::Plot(err)
    }
}

impl From<std::io::Error> for StabilityError {
    fn from(err: std::io::Error) -> Self {
        StabilityError::Io(err)
    }
}

impl From<csv::Error> for StabilityError {
    fn from(err: csv::Error) -> Self {
        StabilityError::Csv(err)
    }
}
