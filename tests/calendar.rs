#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use kitty::db::blocks::Blocks;
    use kitty::db::calendar::Calendar;
    use kitty::libs::block::{BlockDraft, BlockItem};
    use kitty::libs::calendar::{AgendaItem, EventType, NewEvent};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct CalendarTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestContext for CalendarTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("kitty.db");
            CalendarTestContext {
                _temp_dir: temp_dir,
                db_path,
            }
        }
    }

    impl CalendarTestContext {
        fn calendar(&self) -> Calendar {
            Calendar::open(&self.db_path).unwrap()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn at(d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_create_and_get_event(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();

        let id = calendar
            .create_event(
                &NewEvent::new(EventType::Event, "  Dentist ", at(3, 9, 0))
                    .ending_at(at(3, 10, 30))
                    .with_reminder(15),
            )
            .unwrap();

        let event = calendar.get_event(id).unwrap().unwrap();
        assert_eq!(event.title, "Dentist");
        assert_eq!(event.event_type, EventType::Event);
        assert_eq!(event.end, Some(at(3, 10, 30)));
        assert_eq!(event.reminder, 15);
        assert_eq!(event.assigned_block_id, None);
        assert_eq!(event.time_range(), "09:00-10:30");
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_event_validation(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();

        let blank = NewEvent::new(EventType::Task, "  ", at(3, 9, 0));
        assert!(calendar.create_event(&blank).unwrap_err().is_validation());

        let backwards = NewEvent::new(EventType::Task, "Laundry", at(3, 9, 0)).ending_at(at(3, 8, 0));
        assert!(calendar.create_event(&backwards).unwrap_err().is_validation());

        let unknown_block = NewEvent::new(EventType::Task, "Laundry", at(3, 9, 0)).assigned_to(99);
        assert!(calendar.create_event(&unknown_block).unwrap_err().is_validation());

        assert!(calendar.list_events_for_date(day(3)).unwrap().is_empty());
        assert!("meeting".parse::<EventType>().unwrap_err().is_validation());
        assert_eq!(" Task ".parse::<EventType>().unwrap(), EventType::Task);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_assigned_block_is_kept(ctx: &mut CalendarTestContext) {
        let block_id = Blocks::open(&ctx.db_path)
            .unwrap()
            .create(&BlockDraft::standard("Cleaning", "", 30, vec![BlockItem::new("Vacuum")]))
            .unwrap();
        let mut calendar = ctx.calendar();

        let id = calendar
            .create_event(&NewEvent::new(EventType::Task, "Clean up", at(4, 18, 0)).assigned_to(block_id))
            .unwrap();

        assert_eq!(calendar.get_event(id).unwrap().unwrap().assigned_block_id, Some(block_id));
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_events_for_date_in_start_order(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();
        calendar.create_event(&NewEvent::new(EventType::Event, "Lunch", at(5, 12, 0))).unwrap();
        calendar.create_event(&NewEvent::new(EventType::Task, "Standup", at(5, 9, 30))).unwrap();
        calendar.create_event(&NewEvent::new(EventType::Event, "Tomorrow", at(6, 8, 0))).unwrap();

        let titles: Vec<String> = calendar
            .list_events_for_date(day(5))
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Standup", "Lunch"]);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_delete_event(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();
        let id = calendar.create_event(&NewEvent::new(EventType::Event, "Call", at(7, 16, 0))).unwrap();

        calendar.delete_event(id).unwrap();
        assert!(calendar.get_event(id).unwrap().is_none());
        assert!(calendar.delete_event(id).unwrap_err().is_not_found());
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_holiday_upsert_replaces_by_date(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();

        let first = calendar.upsert_holiday(day(25), "Xmas", None).unwrap();
        let second = calendar.upsert_holiday(day(25), "Christmas", Some("public")).unwrap();
        calendar.upsert_holiday(day(1), "Bank day", None).unwrap();
        assert_eq!(first, second);

        let holidays = calendar.list_holidays().unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[0].date, day(1));
        assert_eq!(holidays[1].name, "Christmas");
        assert_eq!(holidays[1].holiday_type.as_deref(), Some("public"));

        assert!(calendar.upsert_holiday(day(2), " ", None).unwrap_err().is_validation());
        calendar.delete_holiday(day(1)).unwrap();
        assert!(calendar.delete_holiday(day(1)).unwrap_err().is_not_found());
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_day_agenda_lists_holidays_first(ctx: &mut CalendarTestContext) {
        let mut calendar = ctx.calendar();
        calendar.create_event(&NewEvent::new(EventType::Event, "Dinner", at(24, 19, 0))).unwrap();
        calendar.upsert_holiday(day(24), "Christmas Eve", None).unwrap();
        calendar.create_event(&NewEvent::new(EventType::Task, "Wrap gifts", at(24, 10, 0))).unwrap();

        let agenda = calendar.day_agenda(day(24)).unwrap();

        assert_eq!(agenda.len(), 3);
        assert!(matches!(agenda[0], AgendaItem::Holiday(_)));
        let titles: Vec<&str> = agenda.iter().map(|item| item.title()).collect();
        assert_eq!(titles, vec!["Christmas Eve", "Wrap gifts", "Dinner"]);

        assert!(calendar.day_agenda(day(23)).unwrap().is_empty());
    }
}
