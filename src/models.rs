use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Position of a mentor in a mentee's preference list.
///
/// Every stated preference orders before `Unranked`, so the derived `Ord`
/// is exactly the "lower is better" comparison the allocator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// 1-based position in the preference list.
    Preferred(u8),
    /// Matched on eligibility alone.
    Unranked,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Preferred(position) => write!(f, "{}", position),
            Rank::Unranked => f.write_str("inf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mentee {
    pub name: String,
    pub email: String,
    pub graduation_year: i32,
    pub registered_at: NaiveDateTime,
    pub country: String,
    pub department: String,
    pub preferences: Vec<String>, // most preferred first
}

impl Mentee {
    pub fn is_preferred(&self, mentor: &Mentor) -> bool {
        self.preferences.iter().any(|name| *name == mentor.name)
    }

    pub fn preference_rank(&self, mentor: &Mentor) -> Rank {
        self.preferences
            .iter()
            .position(|name| *name == mentor.name)
            .and_then(|idx| u8::try_from(idx + 1).ok())
            .map_or(Rank::Unranked, Rank::Preferred)
    }

    /// Allocation priority: earlier graduates first, then earlier registrations.
    pub fn priority_key(&self) -> (i32, NaiveDateTime) {
        (self.graduation_year, self.registered_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mentor {
    pub name: String,
    pub email: String,
    pub country: String,
    pub department: String,
    pub capacity: u32,
    pub total_capacity: u32,
}

impl Mentor {
    pub fn new(name: String, email: String, country: String, department: String, capacity: u32) -> Self {
        Self {
            name,
            email,
            country,
            department,
            capacity,
            total_capacity: capacity,
        }
    }

    pub fn is_eligible_for(&self, mentee: &Mentee) -> bool {
        self.country == mentee.country && self.department == mentee.department
    }

    pub fn has_capacity(&self) -> bool {
        self.capacity > 0
    }

    pub fn assigned_count(&self) -> u32 {
        self.total_capacity - self.capacity
    }

    /// Books one slot. Callers check `has_capacity` first.
    pub(crate) fn take_slot(&mut self) {
        debug_assert!(self.has_capacity(), "mentor {} is fully booked", self.name);
        self.capacity = self.capacity.saturating_sub(1);
    }
}

/// One accepted pairing, as indices into the slices given to the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub mentee: usize,
    pub mentor: usize,
    pub rank: Rank,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllocationRow<'a> {
    pub mentee_name: &'a str,
    pub mentee_email: &'a str,
    pub mentor_name: &'a str,
    pub mentor_email: &'a str,
    pub country: &'a str,
    pub mentee_year: i32,
    pub department: &'a str,
    pub mentor_capacity_left: u32,
    pub mentor_total_capacity: u32,
    pub rank: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnallocatedMenteeRow<'a> {
    pub mentee_name: &'a str,
    pub mentee_email: &'a str,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnallocatedMentorRow<'a> {
    pub mentor_name: &'a str,
    pub mentor_email: &'a str,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Mentee, Mentor};
    use chrono::NaiveDate;

    pub fn mentee(name: &str, year: i32, minute: u32, prefs: &[&str]) -> Mentee {
        Mentee {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            graduation_year: year,
            registered_at: NaiveDate::from_ymd_opt(2023, 6, 1)
                .unwrap()
                .and_hms_opt(10, minute, 0)
                .unwrap(),
            country: "USA".to_string(),
            department: "CS".to_string(),
            preferences: prefs.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn mentor(name: &str, capacity: u32) -> Mentor {
        Mentor::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            "USA".to_string(),
            "CS".to_string(),
            capacity,
        )
    }
}
