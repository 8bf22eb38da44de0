use crate::models::{Assignment, Mentee, Mentor, Rank};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Which mentors count as candidates for a mentee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Any preferred mentor, plus eligible mentors as unranked fallbacks.
    #[default]
    PreferredOrEligible,
    /// Only eligible mentors; preferences just order them.
    EligibleOnly,
    /// Only mentors the mentee listed.
    PreferredOnly,
}

impl MatchPolicy {
    fn admits(&self, preferred: bool, eligible: bool) -> bool {
        match self {
            MatchPolicy::PreferredOrEligible => preferred || eligible,
            MatchPolicy::EligibleOnly => eligible,
            MatchPolicy::PreferredOnly => preferred,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AllocationSummary {
    pub mentors: usize,
    pub mentees: usize,
    pub allocated: usize,
    pub by_rank: BTreeMap<Rank, usize>,
}

pub struct Allocator {
    policy: MatchPolicy,
}

impl Allocator {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    /// Greedy single pass: each mentee, in the given order, takes the
    /// lowest-ranked candidate that still has a free slot. Nothing is
    /// revisited once booked. Equal ranks go to the mentor listed first.
    pub fn allocate(&self, mentees: &[Mentee], mentors: &mut [Mentor]) -> Vec<Assignment> {
        let mut assignments = Vec::new();

        for (mentee_idx, mentee) in mentees.iter().enumerate() {
            let best = self.best_candidate(mentee, mentors);

            match best {
                Some((mentor_idx, rank)) => {
                    let mentor = &mut mentors[mentor_idx];
                    mentor.take_slot();
                    debug!(
                        mentee = %mentee.name,
                        mentor = %mentor.name,
                        %rank,
                        booked = mentor.assigned_count(),
                        "assigned"
                    );
                    assignments.push(Assignment {
                        mentee: mentee_idx,
                        mentor: mentor_idx,
                        rank,
                    });
                }
                None => debug!(mentee = %mentee.name, "no candidate mentor"),
            }
        }

        assignments
    }

    fn best_candidate(&self, mentee: &Mentee, mentors: &[Mentor]) -> Option<(usize, Rank)> {
        let mut best: Option<(usize, Rank)> = None;

        for (idx, mentor) in mentors.iter().enumerate() {
            if !mentor.has_capacity() {
                continue;
            }
            if !self.policy.admits(mentee.is_preferred(mentor), mentor.is_eligible_for(mentee)) {
                continue;
            }

            let rank = mentee.preference_rank(mentor);
            // strict comparison keeps the first mentor on ties
            if best.map_or(true, |(_, best_rank)| rank < best_rank) {
                best = Some((idx, rank));
            }
        }

        best
    }
}

/// Stable ascending sort by graduation year, then registration time.
pub fn sort_by_priority(mentees: &mut [Mentee]) {
    mentees.sort_by_key(Mentee::priority_key);
}

pub fn unallocated_mentees<'a>(mentees: &'a [Mentee], assignments: &[Assignment]) -> Vec<&'a Mentee> {
    let mut allocated = vec![false; mentees.len()];
    for assignment in assignments {
        allocated[assignment.mentee] = true;
    }

    mentees
        .iter()
        .zip(allocated)
        .filter(|(_, is_allocated)| !is_allocated)
        .map(|(mentee, _)| mentee)
        .collect()
}

pub fn unallocated_mentors<'a>(mentors: &'a [Mentor], assignments: &[Assignment]) -> Vec<&'a Mentor> {
    let mut used = vec![false; mentors.len()];
    for assignment in assignments {
        used[assignment.mentor] = true;
    }

    mentors
        .iter()
        .zip(used)
        .filter(|(_, is_used)| !is_used)
        .map(|(mentor, _)| mentor)
        .collect()
}

impl AllocationSummary {
    pub fn new(mentees: &[Mentee], mentors: &[Mentor], assignments: &[Assignment]) -> Self {
        let mut by_rank = BTreeMap::new();
        for assignment in assignments {
            *by_rank.entry(assignment.rank).or_insert(0) += 1;
        }

        Self {
            mentors: mentors.len(),
            mentees: mentees.len(),
            allocated: assignments.len(),
            by_rank,
        }
    }
}
