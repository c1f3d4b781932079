use std::fmt::{Display, Formatter, Result as FmtResult};

/// How long an object produced by a binding lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
    /// Constructed on the first resolution, then cached and shared by every
    /// later resolution for as long as the container lives.
    Singleton,
    /// Constructed anew on every resolution and owned by the caller.
    Transient,
}

impl Lifetime {
    pub fn to_str(&self) -> &'static str {
        match self {
            Self::Singleton => "Singleton",
            Self::Transient => "Transient",
        }
    }
}

impl Display for Lifetime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_str())
    }
}

/// Type-level marker of [`Lifetime::Singleton`], used by the binding DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Singleton;

/// Type-level marker of [`Lifetime::Transient`], used by the binding DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transient;

/// Maps a lifetime marker to its [`Lifetime`] value.
#[allow(private_bounds)]
pub trait ToLifetime: Sealed + Copy + Send + Sync + 'static {
    const LIFETIME: Lifetime;
}

impl ToLifetime for Singleton {
    const LIFETIME: Lifetime = Lifetime::Singleton;
}

impl ToLifetime for Transient {
    const LIFETIME: Lifetime = Lifetime::Transient;
}

trait Sealed {}

impl Sealed for Singleton {}

impl Sealed for Transient {}
