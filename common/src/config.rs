use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::cell::Dimensions;
use crate::error::{Error, Result};

/// Parameters of a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
    /// Fixed seed for mine placement and guesses. `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            height: 8,
            width: 8,
            mines: 8,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks the board is non-empty and can hold the requested mines.
    pub fn validate(&self) -> Result<Dimensions> {
        let dims = Dimensions::new(self.height, self.width)?;
        if self.mines > dims.capacity() {
            return Err(Error::InvalidConfiguration {
                reason: format!(
                    "{} mines do not fit on a {}x{} board",
                    self.mines, self.height, self.width
                ),
            });
        }
        Ok(dims)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        let dims = config.validate().unwrap();
        assert_eq!(dims.capacity(), 64);
    }

    #[test]
    fn test_full_board_allowed() {
        let config = GameConfig {
            height: 3,
            width: 3,
            mines: 9,
            seed: None,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_too_many_mines() {
        let config = GameConfig {
            height: 3,
            width: 3,
            mines: 10,
            seed: None,
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GameConfig {
            seed: Some(7),
            ..GameConfig::default()
        };
        let mut first = config.rng();
        let mut second = config.rng();
        let a: Vec<u32> = (0..16).map(|_| first.random()).collect();
        let b: Vec<u32> = (0..16).map(|_| second.random()).collect();
        assert_eq!(a, b);
    }
}
