//! Table position.

use std::convert::TryFrom;
use std::fmt::Display;

use rand::distributions::{Distribution, Standard};
use serde::{Deserialize, Serialize};

/// Table position. Seats are numbered 0..3 in play order, and serialized as
/// plain player indices; the cardinal names follow the usual table diagram
/// with North as player 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Seat {
    North,
    East,
    South,
    West,
}

impl Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        })
    }
}

impl Distribution<Seat> for Standard {
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Seat {
        Seat::try_from(rng.gen_range(0..4u8)).expect("in range")
    }
}

impl TryFrom<u8> for Seat {
    type Error = ();

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Ok(match index {
            0 => Seat::North,
            1 => Seat::East,
            2 => Seat::South,
            3 => Seat::West,
            _ => return Err(()),
        })
    }
}

impl Serialize for Seat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.index())
    }
}

impl<'de> Deserialize<'de> for Seat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let index = u8::deserialize(deserializer)?;
        Seat::try_from(index)
            .map_err(|()| serde::de::Error::custom(format!("invalid player index {index}")))
    }
}

impl Seat {
    /// All four seats, in play order.
    pub fn all_seats() -> &'static [Seat; 4] {
        static SEATS: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];
        &SEATS
    }

    /// The player index for this seat.
    pub fn index(self) -> u8 {
        match self {
            Seat::North => 0,
            Seat::East => 1,
            Seat::South => 2,
            Seat::West => 3,
        }
    }

    /// The team for this seat.
    pub fn team(self) -> Team {
        Team::from(self)
    }

    /// This seat's partner, sitting opposite.
    pub fn partner(self) -> Seat {
        self.next().next()
    }

    /// The next seat in play order.
    pub fn next(self) -> Seat {
        match self {
            Seat::North => Seat::East,
            Seat::East => Seat::South,
            Seat::South => Seat::West,
            Seat::West => Seat::North,
        }
    }

    /// The previous seat in play order.
    pub fn prev(self) -> Seat {
        self.next().next().next()
    }

    /// The next N seats in play order.
    pub fn next_n(mut self, n: usize) -> Vec<Seat> {
        let mut order = Vec::with_capacity(n);
        for _ in 0..n {
            self = self.next();
            order.push(self);
        }
        order
    }
}

/// A team consists of the two seats opposite one another: players {0, 2}
/// against players {1, 3}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    NorthSouth,
    EastWest,
}

impl From<Seat> for Team {
    fn from(value: Seat) -> Self {
        match value {
            Seat::North | Seat::South => Team::NorthSouth,
            Seat::East | Seat::West => Team::EastWest,
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Team::NorthSouth => "North/South",
            Team::EastWest => "East/West",
        })
    }
}

impl Team {
    /// Both teams, in index order.
    pub fn both() -> &'static [Team; 2] {
        static TEAMS: [Team; 2] = [Team::NorthSouth, Team::EastWest];
        &TEAMS
    }

    /// The team index: 0 for players {0, 2}, 1 for players {1, 3}.
    pub fn index(self) -> usize {
        match self {
            Team::NorthSouth => 0,
            Team::EastWest => 1,
        }
    }

    /// The two seats on this team.
    pub fn seats(self) -> [Seat; 2] {
        match self {
            Team::NorthSouth => [Seat::North, Seat::South],
            Team::EastWest => [Seat::East, Seat::West],
        }
    }

    /// The other team.
    pub fn other(self) -> Team {
        match self {
            Team::NorthSouth => Team::EastWest,
            Team::EastWest => Team::NorthSouth,
        }
    }
}
