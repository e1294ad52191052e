//! Derivative modes and the keyed per-mode container.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which derivative a crop region belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Wide 16:9 thumbnail shown in grids.
    #[default]
    Card,
    /// Tall 2:3 portrait shown in the record detail view.
    Detail,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Card, Mode::Detail];

    /// Lowercase name, used in storage paths and log lines.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Card => "card",
            Mode::Detail => "detail",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Mode::Card),
            "detail" => Ok(Mode::Detail),
            other => Err(format!("unknown crop mode: {other}")),
        }
    }
}

/// One value per [`Mode`].
///
/// Crop states, previews and export outputs are all held in this structure
/// so that a mode can only ever reach its own slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerMode<T> {
    pub card: T,
    pub detail: T,
}

impl<T> PerMode<T> {
    pub fn new(card: T, detail: T) -> Self {
        Self { card, detail }
    }

    /// Build both slots from a function of the mode.
    pub fn from_fn(mut f: impl FnMut(Mode) -> T) -> Self {
        Self {
            card: f(Mode::Card),
            detail: f(Mode::Detail),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Mode, T) -> U) -> PerMode<U> {
        PerMode {
            card: f(Mode::Card, self.card),
            detail: f(Mode::Detail, self.detail),
        }
    }

    pub fn try_map<U, E>(self, mut f: impl FnMut(Mode, T) -> Result<U, E>) -> Result<PerMode<U>, E> {
        Ok(PerMode {
            card: f(Mode::Card, self.card)?,
            detail: f(Mode::Detail, self.detail)?,
        })
    }

    pub fn as_ref(&self) -> PerMode<&T> {
        PerMode {
            card: &self.card,
            detail: &self.detail,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mode, &T)> {
        [(Mode::Card, &self.card), (Mode::Detail, &self.detail)].into_iter()
    }
}

impl<T> Index<Mode> for PerMode<T> {
    type Output = T;

    fn index(&self, mode: Mode) -> &T {
        match mode {
            Mode::Card => &self.card,
            Mode::Detail => &self.detail,
        }
    }
}

impl<T> IndexMut<Mode> for PerMode<T> {
    fn index_mut(&mut self, mode: Mode) -> &mut T {
        match mode {
            Mode::Card => &mut self.card,
            Mode::Detail => &mut self.detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("card".parse::<Mode>(), Ok(Mode::Card));
        assert_eq!("Detail".parse::<Mode>(), Ok(Mode::Detail));
        assert!("avatar".parse::<Mode>().is_err());
        assert_eq!(Mode::Detail.to_string(), "detail");
    }

    #[test]
    fn test_per_mode_index_is_isolated() {
        let mut values = PerMode::new(1, 2);
        values[Mode::Detail] += 10;
        assert_eq!(values[Mode::Card], 1);
        assert_eq!(values[Mode::Detail], 12);
    }

    #[test]
    fn test_per_mode_try_map_short_circuits() {
        let values = PerMode::new(1, -1);
        let result: Result<PerMode<u32>, Mode> =
            values.try_map(|mode, v| u32::try_from(v).map_err(|_| mode));
        assert_eq!(result, Err(Mode::Detail));
    }

    #[test]
    fn test_per_mode_iter_order() {
        let values = PerMode::from_fn(|m| m.label());
        let collected: Vec<_> = values.iter().map(|(m, v)| (m, *v)).collect();
        assert_eq!(collected, vec![(Mode::Card, "card"), (Mode::Detail, "detail")]);
    }
}
