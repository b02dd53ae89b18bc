//! Home configuration, named rooms, and size classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quest::RoomType;

/// Number of floors in the home, as answered during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FloorCount {
    #[default]
    One,
    Two,
    ThreeOrMore,
}

/// Rough window count, as answered during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WindowAmount {
    Few,
    #[default]
    Average,
    Many,
}

/// Home size bucket derived from bedroom/bathroom counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HomeSize {
    Small,
    Medium,
    Large,
}

/// A user-visible room with cleaning timestamps.
///
/// Rooms are only ever created by the generator and mutated by the session
/// engine (timestamp updates on completion). They are never deleted or
/// renamed automatically -- user-entered names and cleaning history must
/// survive home reconfiguration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRoom {
    pub id: String,
    pub room_type: RoomType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cleaned: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deep_cleaned: Option<DateTime<Utc>>,
}

impl NamedRoom {
    pub fn new(room_type: RoomType, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            room_type,
            name: name.into(),
            last_cleaned: None,
            last_deep_cleaned: None,
        }
    }
}

/// The user's home layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeConfiguration {
    /// Bedroom count; 0 means a studio.
    pub bedrooms: u8,
    /// Bathroom count; may be fractional (1.5 = one full bath + half bath).
    pub bathrooms: f32,
    pub floors: FloorCount,
    pub windows: WindowAmount,
    pub has_pets: bool,
    pub rooms: Vec<NamedRoom>,
}

impl Default for HomeConfiguration {
    fn default() -> Self {
        Self {
            bedrooms: 1,
            bathrooms: 1.0,
            floors: FloorCount::default(),
            windows: WindowAmount::default(),
            has_pets: false,
            rooms: Vec::new(),
        }
    }
}

impl HomeConfiguration {
    /// Classify the home size.
    ///
    /// Studios and 1-bed/1-bath homes are small; anything up to 2 bedrooms
    /// and 2 bathrooms is medium; the rest is large. A studio with extra
    /// bathrooms is medium, not small.
    pub fn size(&self) -> HomeSize {
        if self.bedrooms <= 1 && self.bathrooms <= 1.0 {
            HomeSize::Small
        } else if self.bedrooms <= 2 && self.bathrooms <= 2.0 {
            HomeSize::Medium
        } else {
            HomeSize::Large
        }
    }

    pub fn room(&self, room_id: &str) -> Option<&NamedRoom> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    pub fn room_mut(&mut self, room_id: &str) -> Option<&mut NamedRoom> {
        self.rooms.iter_mut().find(|room| room.id == room_id)
    }

    /// Append any rooms implied by the counts that are missing from the
    /// list. Existing rooms are never removed or renamed. Returns the
    /// number of rooms appended.
    pub fn reconcile_rooms(&mut self) -> usize {
        let desired = generate_default_rooms(self.bedrooms, self.bathrooms, self.has_pets);
        let mut appended = 0;
        for room_type in [
            RoomType::Kitchen,
            RoomType::LivingRoom,
            RoomType::Entryway,
            RoomType::Bedroom,
            RoomType::Bathroom,
            RoomType::PetArea,
        ] {
            let have = self
                .rooms
                .iter()
                .filter(|room| room.room_type == room_type)
                .count();
            for room in desired
                .iter()
                .filter(|room| room.room_type == room_type)
                .skip(have)
            {
                self.rooms.push(room.clone());
                appended += 1;
            }
        }
        appended
    }
}

/// Build the default room list for a home.
///
/// Order is deterministic: kitchen, living room, entryway, then bedrooms,
/// then full bathrooms, one half bath when the count is fractional, and a
/// pet area last. Every room gets a fresh unique id.
pub fn generate_default_rooms(bedrooms: u8, bathrooms: f32, has_pets: bool) -> Vec<NamedRoom> {
    let mut rooms = vec![
        NamedRoom::new(RoomType::Kitchen, "Kitchen"),
        NamedRoom::new(RoomType::LivingRoom, "Living Room"),
        NamedRoom::new(RoomType::Entryway, "Entryway"),
    ];

    for n in 1..=bedrooms {
        rooms.push(NamedRoom::new(RoomType::Bedroom, format!("Bedroom {n}")));
    }

    let full_baths = bathrooms.max(0.0).floor() as u8;
    for n in 1..=full_baths {
        rooms.push(NamedRoom::new(RoomType::Bathroom, format!("Bathroom {n}")));
    }
    if bathrooms.max(0.0).fract() > f32::EPSILON {
        rooms.push(NamedRoom::new(RoomType::Bathroom, "Half Bath"));
    }

    if has_pets {
        rooms.push(NamedRoom::new(RoomType::PetArea, "Pet Area"));
    }

    rooms
}
