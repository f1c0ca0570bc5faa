//! # Storage Locations and Packing Containers
//!
//! Every menu item is packed in one of eight fixed storage locations, marked by
//! a flag column on the menu sheet. Coolers and boxes are further split into
//! numbered bags, one per day, five bags to a container, so that each day's
//! food can be pulled out without unpacking the rest.

use crate::menu_items::MealKind;
use crate::record_normalizer::RawRow;
use serde::{Serialize, Serializer};
use std::fmt;

/// Label used when no storage flag is set
pub const NO_STORAGE_LOCATION: &str = "NO STORAGE LOCATION";

/// Label used when no container can be computed
pub const NO_CONTAINER: &str = "NO CONTAINER";

/// Fixed container for everything in the condiments location
pub const CONDIMENTS_CONTAINER: &str = "condiments box";

/// Bags packed into one cooler or dry box
pub const BAGS_PER_CONTAINER: i64 = 5;

const COOLER_MARKER: &str = "Cooler";
const BOX_MARKER: &str = "Box";

/// The eight physical storage categories, in flag-scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StorageLocation {
    #[serde(rename = "inCoolerFrozen")]
    CoolerFrozen,
    #[serde(rename = "inCoolerCool")]
    CoolerCool,
    #[serde(rename = "inBoxVeg")]
    BoxVeg,
    #[serde(rename = "inBoxFruit")]
    BoxFruit,
    #[serde(rename = "inBoxDry")]
    BoxDry,
    #[serde(rename = "inBoxBread")]
    BoxBread,
    #[serde(rename = "inBoxOther")]
    BoxOther,
    #[serde(rename = "inCondiments")]
    Condiments,
}

impl StorageLocation {
    pub const ALL: [StorageLocation; 8] = [
        StorageLocation::CoolerFrozen,
        StorageLocation::CoolerCool,
        StorageLocation::BoxVeg,
        StorageLocation::BoxFruit,
        StorageLocation::BoxDry,
        StorageLocation::BoxBread,
        StorageLocation::BoxOther,
        StorageLocation::Condiments,
    ];

    /// Column name of this location's flag on the menu sheet
    pub fn key(&self) -> &'static str {
        match self {
            StorageLocation::CoolerFrozen => "inCoolerFrozen",
            StorageLocation::CoolerCool => "inCoolerCool",
            StorageLocation::BoxVeg => "inBoxVeg",
            StorageLocation::BoxFruit => "inBoxFruit",
            StorageLocation::BoxDry => "inBoxDry",
            StorageLocation::BoxBread => "inBoxBread",
            StorageLocation::BoxOther => "inBoxOther",
            StorageLocation::Condiments => "inCondiments",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|location| location.key() == key)
    }

    /// Which kind of container this location packs into, if bagged at all
    pub fn family(&self) -> Option<ContainerFamily> {
        let key = self.key();
        if key.contains(BOX_MARKER) {
            Some(ContainerFamily::DryBox)
        } else if key.contains(COOLER_MARKER) {
            Some(ContainerFamily::Cooler)
        } else {
            None
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// First location whose flag is set on the row, in [`StorageLocation::ALL`] order
pub fn resolve_storage(row: &RawRow) -> Option<StorageLocation> {
    StorageLocation::ALL
        .into_iter()
        .find(|location| row.flag(location.key()))
}

/// Display label for a resolved location, or the sentinel
pub fn storage_label(storage: Option<StorageLocation>) -> &'static str {
    storage.map(|s| s.key()).unwrap_or(NO_STORAGE_LOCATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContainerFamily {
    Cooler,
    DryBox,
}

impl ContainerFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerFamily::Cooler => "cooler",
            ContainerFamily::DryBox => "drybox",
        }
    }
}

/// A physical packing unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    /// Nothing could be computed
    Unassigned,
    /// The shared condiments box
    Condiments,
    /// A numbered bag inside a numbered cooler or dry box
    Bag {
        bag: i64,
        family: ContainerFamily,
        group: i64,
    },
}

impl Container {
    /// Work out the container for a menu item.
    ///
    /// Breakfast and lunch come out of the previous night's bag (`day - 1`);
    /// dinner and anything else use the bag numbered by the day itself.
    /// A negative bag number means there is no sensible container.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use food_planner::menu_items::MealKind;
    /// use food_planner::storage::{Container, StorageLocation};
    ///
    /// let container = Container::for_item(Some(StorageLocation::CoolerCool), Some(6), MealKind::Dinner);
    /// assert_eq!(container.to_string(), "bag 6 cooler 2");
    /// ```
    pub fn for_item(storage: Option<StorageLocation>, day: Option<i64>, meal: MealKind) -> Self {
        let Some(location) = storage else {
            return Container::Unassigned;
        };
        if location == StorageLocation::Condiments {
            return Container::Condiments;
        }

        let bag = match meal {
            MealKind::Breakfast | MealKind::Lunch => day.unwrap_or(0) - 1,
            MealKind::Dinner | MealKind::Other => day.unwrap_or(-1),
        };
        if bag < 0 {
            return Container::Unassigned;
        }

        match location.family() {
            Some(family) => Container::Bag {
                bag,
                family,
                group: bag / BAGS_PER_CONTAINER + 1,
            },
            None => Container::Unassigned,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Unassigned => f.write_str(NO_CONTAINER),
            Container::Condiments => f.write_str(CONDIMENTS_CONTAINER),
            Container::Bag { bag, family, group } => {
                write!(f, "bag {} {} {}", bag, family.as_str(), group)
            }
        }
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
