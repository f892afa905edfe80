use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::domain::directive::Message;
use crate::domain::intent::{slot_value, Slots};
use crate::inventory::{AllowList, InventoryCatalog};

pub const VEHICLE_YEAR: &str = "VehicleYear";
pub const VEHICLE_MAKE: &str = "VehicleMake";
pub const VEHICLE_MODEL: &str = "VehicleModel";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotValidationFailure {
    pub violated_slot: String,
    pub message: Message,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationOutcome {
    Valid,
    Invalid(SlotValidationFailure),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failure(&self) -> Option<&SlotValidationFailure> {
        match self {
            Self::Valid => None,
            Self::Invalid(failure) => Some(failure),
        }
    }
}

/// A check bound to exactly one slot.
///
/// `check` only runs when the slot holds a non-empty value. Sibling slots may be
/// read to phrase the remediation text, never to decide the outcome.
pub trait SlotRule: Send + Sync {
    fn slot(&self) -> &str;
    fn check(&self, value: &str, slots: &Slots) -> Result<(), String>;
}

/// Accepts `min_year_exclusive < year <= current year`.
pub struct YearRule {
    min_year_exclusive: i32,
    clock: Arc<dyn Clock>,
}

impl YearRule {
    pub fn new(min_year_exclusive: i32, clock: Arc<dyn Clock>) -> Self {
        Self { min_year_exclusive, clock }
    }
}

impl SlotRule for YearRule {
    fn slot(&self) -> &str {
        VEHICLE_YEAR
    }

    fn check(&self, value: &str, _slots: &Slots) -> Result<(), String> {
        match value.trim().parse::<i32>() {
            Ok(year) if self.min_year_exclusive < year && year <= self.clock.current_year() => {
                Ok(())
            }
            _ => Err(format!(
                "We do not have any vehicles in our inventory for the year {value}. Please try a year newer than {} and not a date in the future.",
                self.min_year_exclusive
            )),
        }
    }
}

pub struct MakeRule {
    makes: AllowList,
}

impl MakeRule {
    pub fn new(makes: AllowList) -> Self {
        Self { makes }
    }
}

impl SlotRule for MakeRule {
    fn slot(&self) -> &str {
        VEHICLE_MAKE
    }

    fn check(&self, value: &str, _slots: &Slots) -> Result<(), String> {
        if self.makes.contains(value) {
            return Ok(());
        }

        Err(format!(
            "We do not have a {value} vehicle make in our inventory, can you provide a different vehicle make such as {}?",
            self.makes.suggestion()
        ))
    }
}

/// Membership only; the model is not cross-checked against year or make.
pub struct ModelRule {
    models: AllowList,
}

impl ModelRule {
    pub fn new(models: AllowList) -> Self {
        Self { models }
    }
}

impl SlotRule for ModelRule {
    fn slot(&self) -> &str {
        VEHICLE_MODEL
    }

    fn check(&self, value: &str, slots: &Slots) -> Result<(), String> {
        if self.models.contains(value) {
            return Ok(());
        }

        let context = [slot_value(slots, VEHICLE_YEAR), slot_value(slots, VEHICLE_MAKE)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let matching = if context.is_empty() {
            String::new()
        } else {
            format!(" matching a {}", context.join(" "))
        };

        Err(format!(
            "We do not have a {value} vehicle model in our inventory{matching}, can you provide a different vehicle model such as {}?",
            self.models.suggestion()
        ))
    }
}

/// Runs slot rules in priority order and reports the first failure.
pub struct DialogValidator {
    rules: Vec<Box<dyn SlotRule>>,
}

impl DialogValidator {
    pub fn new(rules: Vec<Box<dyn SlotRule>>) -> Self {
        Self { rules }
    }

    /// Year, then make, then model.
    pub fn for_inventory(catalog: &InventoryCatalog, clock: Arc<dyn Clock>) -> Self {
        Self::new(vec![
            Box::new(YearRule::new(catalog.min_year_exclusive, clock)),
            Box::new(MakeRule::new(catalog.makes.clone())),
            Box::new(ModelRule::new(catalog.models.clone())),
        ])
    }

    pub fn rule_slots(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.slot()).collect()
    }

    pub fn validate(&self, slots: &Slots) -> ValidationOutcome {
        for rule in &self.rules {
            let Some(value) = slot_value(slots, rule.slot()) else {
                continue;
            };

            if let Err(remediation) = rule.check(value, slots) {
                return ValidationOutcome::Invalid(SlotValidationFailure {
                    violated_slot: rule.slot().to_string(),
                    message: Message::plain_text(remediation),
                });
            }
        }

        ValidationOutcome::Valid
    }
}
