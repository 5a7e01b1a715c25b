use crate::reminder::Reminder;
use crate::shared::entity::ID;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// In-memory collection of the `Reminder`s that are due on the current
/// calendar day, kept ascending by `due_time`.
///
/// The set also tracks its "near" metadata: the smallest due time present
/// and how many reminders share it. Reminders sharing the near time form
/// one delivery batch, so a single wake-up drains all of them instead of
/// arming one timer per reminder.
///
/// The set itself performs no I/O. Callers persist to the reminder store
/// first and re-arm the trigger scheduler after any mutation.
#[derive(Debug, Default)]
pub struct TodaySet {
    reminders: Vec<Reminder>,
    near_time: Option<NaiveTime>,
    near_count: usize,
}

impl TodaySet {
    pub fn new() -> Self {
        Self {
            reminders: Vec::new(),
            near_time: None,
            near_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// The smallest due time currently present
    pub fn near_time(&self) -> Option<NaiveTime> {
        self.near_time
    }

    /// How many reminders share the near time
    pub fn near_count(&self) -> usize {
        self.near_count
    }

    /// Inserts reminders that are due today, keeping ascending order by
    /// due time. A reminder whose id is already present is skipped, so
    /// pushing the same reminder twice leaves exactly one copy.
    pub fn push(&mut self, reminders: Vec<Reminder>) {
        for reminder in reminders {
            if self.position(&reminder.id).is_some() {
                continue;
            }
            // First index with a later due time. Inserting there keeps
            // insertion order among equal times.
            let insert_at = self
                .reminders
                .iter()
                .position(|r| r.due_time > reminder.due_time)
                .unwrap_or(self.reminders.len());
            self.reminders.insert(insert_at, reminder);
        }
        self.refresh_near();
    }

    /// Removes and returns every reminder sharing the current near time.
    /// Returns an empty vec when the set is empty.
    pub fn pop_near(&mut self) -> Vec<Reminder> {
        let near_time = match self.near_time {
            Some(t) => t,
            None => return Vec::new(),
        };
        let batch_len = self
            .reminders
            .iter()
            .take_while(|r| r.due_time == near_time)
            .count();
        let batch = self.reminders.drain(..batch_len).collect();
        self.refresh_near();
        batch
    }

    /// Removes the reminder with the given id. Absent ids are a no-op,
    /// which covers a user delete racing an already completed delivery.
    pub fn delete(&mut self, reminder_id: &ID) -> bool {
        match self.position(reminder_id) {
            Some(index) => {
                self.reminders.remove(index);
                self.refresh_near();
                true
            }
            None => false,
        }
    }

    /// Mutates the text and/or due time of the reminder with the given
    /// id and returns whether it was found. A time change re-sorts the
    /// entry and re-derives the near metadata.
    ///
    /// Moving a reminder to another calendar day is not an edit of this
    /// set; callers handle that with `delete` (and `push` if the new day
    /// is still today).
    pub fn edit(
        &mut self,
        reminder_id: &ID,
        new_text: Option<&str>,
        new_time: Option<NaiveTime>,
    ) -> bool {
        let index = match self.position(reminder_id) {
            Some(index) => index,
            None => return false,
        };

        if let Some(text) = new_text {
            self.reminders[index].text = Some(text.to_string());
        }
        if let Some(time) = new_time {
            let mut reminder = self.reminders.remove(index);
            reminder.due_time = time;
            self.push(vec![reminder]);
        }
        true
    }

    /// Combines today's calendar date with the near time into the instant
    /// the trigger scheduler should next wake at. `None` when the set is
    /// empty.
    pub fn near_datetime(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        self.near_time.map(|time| today.and_time(time))
    }

    /// Empties the set and resets the near metadata, ahead of a
    /// resynchronization reload.
    pub fn clear(&mut self) {
        self.reminders.clear();
        self.refresh_near();
    }

    fn position(&self, reminder_id: &ID) -> Option<usize> {
        self.reminders.iter().position(|r| r.id == *reminder_id)
    }

    fn refresh_near(&mut self) {
        self.near_time = self.reminders.first().map(|r| r.due_time);
        self.near_count = match self.near_time {
            Some(near_time) => self
                .reminders
                .iter()
                .take_while(|r| r.due_time == near_time)
                .count(),
            None => 0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::PayloadKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd(2021, 2, 21)
    }

    fn reminder_at(hour: u32, min: u32) -> Reminder {
        Reminder {
            id: Default::default(),
            owner_id: 1,
            due_date: today(),
            due_time: NaiveTime::from_hms(hour, min, 0),
            kind: PayloadKind::Text,
            text: Some("water the plants".into()),
            file_ref: None,
        }
    }

    #[test]
    fn pop_near_returns_batches_in_time_order() {
        let mut set = TodaySet::new();
        set.push(vec![
            reminder_at(12, 30),
            reminder_at(9, 0),
            reminder_at(15, 45),
            reminder_at(9, 0),
        ]);

        let mut last_time = None;
        let mut popped = 0;
        while !set.is_empty() {
            let batch = set.pop_near();
            assert!(!batch.is_empty());
            let batch_time = batch[0].due_time;
            assert!(batch.iter().all(|r| r.due_time == batch_time));
            if let Some(last) = last_time {
                assert!(batch_time > last);
            }
            last_time = Some(batch_time);
            popped += batch.len();
        }
        assert_eq!(popped, 4);
    }

    #[test]
    fn same_time_reminders_form_one_batch() {
        // Scenario: 09:00 (id=1), 09:00 (id=2) and 10:00 (id=3)
        let first = reminder_at(9, 0);
        let second = reminder_at(9, 0);
        let third = reminder_at(10, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone(), second.clone(), third.clone()]);
        assert_eq!(set.near_count(), 2);

        let batch = set.pop_near();
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().any(|r| r.id == first.id));
        assert!(batch.iter().any(|r| r.id == second.id));

        let batch = set.pop_near();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, third.id);
        assert!(set.pop_near().is_empty());
    }

    #[test]
    fn pushing_same_id_twice_keeps_one_copy() {
        let reminder = reminder_at(9, 0);
        let mut set = TodaySet::new();
        set.push(vec![reminder.clone()]);
        set.push(vec![reminder.clone()]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.near_count(), 1);
    }

    #[test]
    fn delete_is_idempotent() {
        let reminder = reminder_at(9, 0);
        let mut set = TodaySet::new();
        set.push(vec![reminder.clone(), reminder_at(10, 0)]);

        assert!(set.delete(&reminder.id));
        assert_eq!(set.len(), 1);
        assert!(!set.delete(&reminder.id));
        assert_eq!(set.len(), 1);
        assert!(!set.delete(&Default::default()));
    }

    #[test]
    fn deleted_reminder_never_pops() {
        // Scenario: id=7 at 08:00, deleted before firing
        let reminder = reminder_at(8, 0);
        let mut set = TodaySet::new();
        set.push(vec![reminder.clone(), reminder_at(11, 0)]);
        set.delete(&reminder.id);

        while !set.is_empty() {
            for popped in set.pop_near() {
                assert_ne!(popped.id, reminder.id);
            }
        }
    }

    #[test]
    fn edit_time_reorders() {
        let first = reminder_at(8, 0);
        let second = reminder_at(10, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone(), second.clone()]);

        // 08:00 -> 12:00 moves the reminder behind the 10:00 one
        assert!(set.edit(&first.id, None, Some(NaiveTime::from_hms(12, 0, 0))));
        assert_eq!(set.pop_near()[0].id, second.id);
        let batch = set.pop_near();
        assert_eq!(batch[0].id, first.id);
        assert_eq!(batch[0].due_time, NaiveTime::from_hms(12, 0, 0));
    }

    #[test]
    fn edit_to_earlier_time_moves_forward() {
        let first = reminder_at(9, 0);
        let second = reminder_at(14, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone(), second.clone()]);

        assert!(set.edit(&second.id, None, Some(NaiveTime::from_hms(7, 30, 0))));
        assert_eq!(set.pop_near()[0].id, second.id);
        assert_eq!(set.pop_near()[0].id, first.id);
    }

    #[test]
    fn edit_text_alone_keeps_order() {
        let first = reminder_at(9, 0);
        let second = reminder_at(10, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone(), second.clone()]);

        assert!(set.edit(&first.id, Some("new text"), None));
        assert_eq!(set.near_time(), Some(NaiveTime::from_hms(9, 0, 0)));
        let batch = set.pop_near();
        assert_eq!(batch[0].id, first.id);
        assert_eq!(batch[0].text.as_deref(), Some("new text"));
    }

    #[test]
    fn edit_unknown_id_reports_not_found() {
        let mut set = TodaySet::new();
        set.push(vec![reminder_at(9, 0)]);
        assert!(!set.edit(&Default::default(), Some("text"), None));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn edit_splits_a_joint_batch() {
        // Two reminders share 09:00; editing one to 09:30 must split the
        // batch so the first wake-up only drains the remaining one.
        let first = reminder_at(9, 0);
        let second = reminder_at(9, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone(), second.clone()]);
        assert_eq!(set.near_count(), 2);

        assert!(set.edit(&second.id, None, Some(NaiveTime::from_hms(9, 30, 0))));
        assert_eq!(set.near_count(), 1);
        let batch = set.pop_near();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, first.id);
    }

    #[test]
    fn near_metadata_tracks_mutations() {
        let mut set = TodaySet::new();
        assert_eq!(set.near_time(), None);
        assert_eq!(set.near_count(), 0);
        assert_eq!(set.near_datetime(today()), None);

        let early = reminder_at(7, 15);
        set.push(vec![reminder_at(9, 0), early.clone(), reminder_at(7, 15)]);
        assert_eq!(set.near_time(), Some(NaiveTime::from_hms(7, 15, 0)));
        assert_eq!(set.near_count(), 2);
        assert_eq!(
            set.near_datetime(today()),
            Some(today().and_hms(7, 15, 0))
        );

        set.delete(&early.id);
        assert_eq!(set.near_count(), 1);

        let batch = set.pop_near();
        assert_eq!(batch.len(), 1);
        assert_eq!(set.near_time(), Some(NaiveTime::from_hms(9, 0, 0)));
        assert_eq!(set.near_count(), 1);
    }

    #[test]
    fn clear_resets_everything() {
        let mut set = TodaySet::new();
        set.push(vec![reminder_at(9, 0), reminder_at(10, 0)]);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.near_time(), None);
        assert_eq!(set.near_count(), 0);
        assert!(set.pop_near().is_empty());
    }

    #[test]
    fn equal_times_pop_in_insertion_order() {
        let first = reminder_at(9, 0);
        let second = reminder_at(9, 0);
        let mut set = TodaySet::new();
        set.push(vec![first.clone()]);
        set.push(vec![second.clone()]);

        let batch = set.pop_near();
        assert_eq!(batch[0].id, first.id);
        assert_eq!(batch[1].id, second.id);
    }
}
