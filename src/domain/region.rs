//! Coarse regions of Taiwan and the cities that belong to each.
//!
//! City names are stored in canonical (`台`) form; compare against
//! [`normalize_city`](crate::domain::normalize::normalize_city) output.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Region {
    North,
    Central,
    South,
    East,
    Islands,
}

const NORTH: &[&str] = &["台北市", "新北市", "基隆市", "桃園市", "新竹市", "新竹縣", "宜蘭縣"];
const CENTRAL: &[&str] = &["苗栗縣", "台中市", "彰化縣", "南投縣", "雲林縣"];
const SOUTH: &[&str] = &["嘉義市", "嘉義縣", "台南市", "高雄市", "屏東縣"];
const EAST: &[&str] = &["花蓮縣", "台東縣"];
const ISLANDS: &[&str] = &["澎湖縣", "金門縣", "連江縣"];

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::Central,
        Region::South,
        Region::East,
        Region::Islands,
    ];

    /// Parses a request value. Accepts the short label (`北`), the long label
    /// (`北部`) and the English slug (`north`). Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Region> {
        match raw.trim() {
            "北" | "北部" | "north" => Some(Region::North),
            "中" | "中部" | "central" => Some(Region::Central),
            "南" | "南部" | "south" => Some(Region::South),
            "東" | "東部" | "east" => Some(Region::East),
            "離島" | "islands" => Some(Region::Islands),
            _ => None,
        }
    }

    /// Short label used in forms and query strings.
    pub fn label(self) -> &'static str {
        match self {
            Region::North => "北",
            Region::Central => "中",
            Region::South => "南",
            Region::East => "東",
            Region::Islands => "離島",
        }
    }

    pub fn cities(self) -> &'static [&'static str] {
        match self {
            Region::North => NORTH,
            Region::Central => CENTRAL,
            Region::South => SOUTH,
            Region::East => EAST,
            Region::Islands => ISLANDS,
        }
    }

    /// `city` must already be normalized.
    pub fn contains(self, city: &str) -> bool {
        self.cities().contains(&city)
    }
}
