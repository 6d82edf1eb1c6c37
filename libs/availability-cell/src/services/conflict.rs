//! Pure conflict resolution for candidate slot batches. No I/O here:
//! callers load the practitioner's existing documents and pass them in.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::models::{
    AvailabilityDocument, AvailabilityError, ConflictReport, ConflictScope, Slot, SlotDay,
    SlotInput, TimeRange,
};

/// Phase 1: syntactic validation. Day must be one of the seven full
/// weekday names, boundaries must parse as "HH:mm", and a slot must end
/// strictly after it starts (slots never cross midnight).
pub fn parse_slots(inputs: &[SlotInput]) -> Result<Vec<Slot>, AvailabilityError> {
    let mut slots = Vec::with_capacity(inputs.len());

    for input in inputs {
        let day: SlotDay = input.day.parse().map_err(|_| {
            AvailabilityError::Validation(format!(
                "'{}' is not a valid day of week; expected one of the full weekday names",
                input.day
            ))
        })?;

        let start_time = parse_time(&input.start_time)?;
        let end_time = parse_time(&input.end_time)?;

        if end_time <= start_time {
            return Err(AvailabilityError::Validation(format!(
                "Slot {} {}-{} must end strictly after it starts",
                day, input.start_time, input.end_time
            )));
        }

        slots.push(Slot {
            day,
            start_time,
            end_time,
            is_active: true,
        });
    }

    Ok(slots)
}

/// Phase 2: overlaps inside the candidate batch itself. Candidates are
/// grouped by day and sorted by start; any adjacent pair where the next
/// slot starts before the previous one ends is a conflict.
pub fn check_intra_batch(candidates: &[Slot], clinic_id: Uuid) -> Result<(), AvailabilityError> {
    let mut by_day: BTreeMap<SlotDay, Vec<&Slot>> = BTreeMap::new();
    for slot in candidates.iter().filter(|slot| slot.is_active) {
        by_day.entry(slot.day).or_default().push(slot);
    }

    for (day, mut slots) in by_day {
        slots.sort_by_key(|slot| slot.start_time);

        for pair in slots.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.start_time < prev.end_time {
                return Err(AvailabilityError::Conflict(ConflictReport {
                    day,
                    candidate: range_of(next),
                    existing: range_of(prev),
                    scope: ConflictScope::SameClinic,
                    clinic_id: Some(clinic_id),
                }));
            }
        }
    }

    Ok(())
}

/// Overlap check of candidates against one already-stored slot list,
/// reporting conflicts under the given scope. Used for append writes
/// (candidates vs. the pair's own stored slots).
pub fn check_against_slots(
    candidates: &[Slot],
    existing: &[Slot],
    scope: ConflictScope,
    clinic_id: Uuid,
) -> Result<(), AvailabilityError> {
    for candidate in candidates.iter().filter(|slot| slot.is_active) {
        for stored in existing.iter().filter(|slot| slot.is_active) {
            if stored.day == candidate.day
                && overlaps(
                    candidate.start_time,
                    candidate.end_time,
                    stored.start_time,
                    stored.end_time,
                )
            {
                return Err(AvailabilityError::Conflict(ConflictReport {
                    day: candidate.day,
                    candidate: range_of(candidate),
                    existing: range_of(stored),
                    scope,
                    clinic_id: Some(clinic_id),
                }));
            }
        }
    }

    Ok(())
}

/// Phase 3: candidates against every other clinic's document for the
/// same practitioner. The document being edited must not be in
/// `other_documents`; archived documents do not count.
pub fn check_cross_clinic(
    candidates: &[Slot],
    other_documents: &[AvailabilityDocument],
    editing_clinic: Uuid,
) -> Result<(), AvailabilityError> {
    for document in other_documents {
        if document.clinic_id == editing_clinic || document.archived_at.is_some() {
            continue;
        }

        for candidate in candidates.iter().filter(|slot| slot.is_active) {
            for stored in document.active_slots() {
                if stored.day == candidate.day
                    && overlaps(
                        candidate.start_time,
                        candidate.end_time,
                        stored.start_time,
                        stored.end_time,
                    )
                {
                    return Err(AvailabilityError::Conflict(ConflictReport {
                        day: candidate.day,
                        candidate: range_of(candidate),
                        existing: range_of(stored),
                        scope: ConflictScope::OtherClinic,
                        clinic_id: Some(document.clinic_id),
                    }));
                }
            }
        }
    }

    Ok(())
}

/// Half-open interval intersection: ranges touching exactly at a
/// boundary do not overlap.
fn overlaps(
    new_start: NaiveTime,
    new_end: NaiveTime,
    existing_start: NaiveTime,
    existing_end: NaiveTime,
) -> bool {
    new_start < existing_end && new_end > existing_start
}

fn range_of(slot: &Slot) -> TimeRange {
    TimeRange {
        start: slot.start_time,
        end: slot.end_time,
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, AvailabilityError> {
    NaiveTime::parse_from_str(raw, crate::models::hhmm::FORMAT).map_err(|_| {
        AvailabilityError::Validation(format!(
            "'{}' is not a valid time; expected 24-hour \"HH:mm\"",
            raw
        ))
    })
}
