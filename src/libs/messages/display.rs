//! User-facing text of every [`Message`].
//!
//! All wording lives here so command handlers and the store layer only deal
//! with typed variants.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            // === BLOCK MESSAGES ===
            Message::BlockCreated(name) => format!("Block '{}' created", name),
            Message::BlockUpdated(name) => format!("Block '{}' updated", name),
            Message::BlockDeleted(name) => format!("Block '{}' deleted", name),
            Message::BlocksHeader => "Blocks:".to_string(),
            Message::BlockHeader(name, block_type) => format!("{} [{}]", name, block_type),
            Message::BlockHasNoItems => "This block has no items".to_string(),
            Message::NoBlocksFound => "No blocks yet. Create one with 'kitty block create'".to_string(),
            Message::EditingBlock(name) => format!("Editing block '{}'", name),
            Message::EstimatedTime(time) => format!("Estimated time: {}", time),
            Message::OptionOf(parent_id) => format!("Option of roulette #{}", parent_id),
            Message::ConfirmDeleteBlock(name) => format!("Delete block '{}' and its subtasks?", name),
            Message::ConfirmDeleteRoulette(name, count) => {
                format!("Delete roulette '{}' with its {} option(s)?", name, count)
            }
            Message::ConfirmReplaceItems(count) => format!("Replace the {} current item(s)?", count),
            Message::ItemsWillBeRecreated => "Items are recreated with new ids; past runs keep their names".to_string(),
            Message::EnterSubtasks => "Enter subtasks, an empty line finishes:".to_string(),
            Message::EnterOptions => "Enter options, an empty name finishes:".to_string(),
            Message::PromptBlockName => "Block name".to_string(),
            Message::PromptBlockType => "Block type".to_string(),
            Message::PromptBlockDescription => "Description".to_string(),
            Message::PromptEstimatedMinutes => "Estimated minutes".to_string(),
            Message::PromptSubtask(n) => format!("Subtask {}", n),
            Message::PromptOption(n) => format!("Option {}", n),
            Message::PromptOptionSubtasks => "Subtasks (comma separated)".to_string(),

            // === BLOCK VALIDATION ===
            Message::BlockNameRequired => "Block name cannot be empty".to_string(),
            Message::BlockItemsRequired => "A block needs at least one non-empty item".to_string(),
            Message::BlockTypeImmutable(block_type) => format!("Block type cannot change (stored as {})", block_type),
            Message::OptionEditedDirectly(id) => {
                format!("Block #{} is a roulette option; edit it through its roulette", id)
            }
            Message::UnknownBlockType(value) => format!("Unknown block type '{}'", value),
            Message::InvalidMinutes(value) => format!("Invalid minutes '{}'", value),
            Message::BlockIdRequired => "Specify a block id or an event".to_string(),

            // === ROULETTE MESSAGES ===
            Message::RouletteWinner(name, id) => format!("The roulette picked '{}' (#{})", name, id),
            Message::RouletteIdRequired => "Specify the roulette to spin".to_string(),
            Message::NotARoulette(name) => format!("'{}' is not a roulette", name),
            Message::RouletteNotRunnable(name) => format!("'{}' is a roulette; spin it and run the winner", name),

            // === EXECUTION MESSAGES ===
            Message::ExecutionStarted(name) => format!("Running '{}'", name),
            Message::ExecutionProgress(done, total) => format!("{}/{} subtasks done", done, total),
            Message::ExecutionCompleted(name) => format!("'{}' completed", name),
            Message::ExecutionCompletedPartially(name) => format!("'{}' completed with open subtasks", name),
            Message::ExecutionAbandoned(id) => format!("Run #{} discarded", id),
            Message::ExecutionLeftOpen(id) => {
                format!("Run #{} left in progress; discard it with 'kitty run --abandon {}'", id, id)
            }
            Message::ExecutionAlreadyCompleted(id) => format!("Run #{} is already completed", id),
            Message::ExecutionNotFound(id) => format!("Run #{} not found", id),
            Message::ExecutionHeader(name, status) => format!("{} ({})", name, status),
            Message::SubtaskIndexOutOfRange { index, total } => {
                format!("Subtask {} does not exist, the run has {}", index, total)
            }
            Message::DuplicateSubtask(id) => format!("Subtask #{} is listed more than once", id),
            Message::EventWithoutBlock(id) => format!("Event #{} has no block assigned", id),
            Message::PromptTickSubtasks => "Tick completed subtasks".to_string(),
            Message::ConfirmFinishExecution => "Finish this run?".to_string(),
            Message::ConfirmAbandonExecution => "Discard this run?".to_string(),
            Message::NoSubtaskStatuses => "No subtasks were recorded for this run".to_string(),

            // === HISTORY MESSAGES ===
            Message::HistoryHeader => "Recent runs:".to_string(),
            Message::OpenExecutionsHeader => "Runs in progress:".to_string(),
            Message::NoHistory => "No runs yet".to_string(),
            Message::NoOpenExecutions => "No runs in progress".to_string(),
            Message::WeeklyStreak(count) => format!("Completed in the last 7 days: {}", count),

            // === DIARY MESSAGES ===
            Message::DiaryEntrySaved(date) => format!("Diary entry for {} saved", date),
            Message::DiaryEntryDeleted(date) => format!("Diary entry for {} deleted", date),
            Message::DiaryHeader => "Diary:".to_string(),
            Message::NoDiaryEntries => "No diary entries".to_string(),
            Message::MoodStatsHeader(count) => format!("Mood over the last {} entries:", count),
            Message::MoodOutOfRange(mood) => format!("Mood must be between 1 and 5, got {}", mood),
            Message::ConfirmDeleteEntry(date) => format!("Delete the diary entry for {}?", date),
            Message::PromptMood => "Mood".to_string(),
            Message::PromptNotes => "Notes".to_string(),

            // === TAG MESSAGES ===
            Message::EntryTagged(date, tag) => format!("Entry {} tagged '{}'", date, tag),
            Message::EntryUntagged(date, tag) => format!("Tag '{}' removed from {}", tag, date),
            Message::EntryNotTagged(date, tag) => format!("Entry {} is not tagged '{}'", date, tag),
            Message::TagListHeader => "Tags:".to_string(),
            Message::NoTagsFound => "No tags found".to_string(),
            Message::TagNameRequired => "Tag cannot be empty".to_string(),

            // === CALENDAR MESSAGES ===
            Message::EventCreated(title, id) => format!("'{}' scheduled (#{})", title, id),
            Message::EventDeleted(id) => format!("Event #{} deleted", id),
            Message::EventNotFound(id) => format!("Event #{} not found", id),
            Message::EventHeader(title, start) => format!("{} at {}", title, start),
            Message::EventTitleRequired => "Title cannot be empty".to_string(),
            Message::EventEndsBeforeStart => "End cannot be before start".to_string(),
            Message::AssignedBlockMissing(id) => format!("Block #{} does not exist", id),
            Message::UnknownEventType(value) => format!("Unknown event type '{}'", value),
            Message::AgendaHeader(date) => format!("Agenda for {}:", date),
            Message::NothingScheduled(date) => format!("Nothing scheduled for {}", date),
            Message::HolidaySaved(name, date) => format!("Holiday '{}' saved for {}", name, date),
            Message::HolidayDeleted(date) => format!("Holiday on {} removed", date),
            Message::HolidaysHeader => "Holidays:".to_string(),
            Message::NoHolidays => "No holidays registered".to_string(),
            Message::HolidayNameRequired => "Holiday name cannot be empty".to_string(),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD", value),
            Message::InvalidDateTime(value) => format!("Invalid date and time '{}', expected YYYY-MM-DD HH:MM", value),

            // === ACCOUNT MESSAGES ===
            Message::SignedUp(email) => format!("Account {} created and signed in", email),
            Message::SignedIn(email) => format!("Signed in as {}", email),
            Message::SignedInAs(email, since) => format!("Signed in as {} since {}", email, since),
            Message::SignedOut => "Signed out".to_string(),
            Message::NotSignedIn => "Not signed in".to_string(),
            Message::InvalidCredentials => "Invalid credentials".to_string(),
            Message::InvalidEmail(email) => format!("Invalid email '{}'", email),
            Message::EmailTaken(email) => format!("An account for {} already exists", email),
            Message::PasswordRequired => "Password cannot be empty".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptDisplayName => "Name".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptPasswordConfirm => "Repeat password".to_string(),

            // === DATABASE MESSAGES ===
            Message::DatabaseReady(path) => format!("Database ready at {}", path),
            Message::SchemaVersion(current, latest) => format!("Schema version {} of {}", current, latest),
            Message::NoOrphansFound => "No orphaned rows found".to_string(),
            Message::OrphansFound(count) => format!("Found {} orphaned row(s)", count),
            Message::OrphansRemoved(count) => format!("Removed {} orphaned row(s)", count),
            Message::QueryReturnedNoRows => "Query returned no rows".to_string(),
            Message::StatementApplied(changes, id) => format!("{} row(s) changed, last inserted id {}", changes, id),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigNotFound => "No configuration to remove".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::ConfigModuleDatabase => "Database settings:".to_string(),
            Message::PromptDatabaseFileName => "Database file name".to_string(),
            Message::ConfigModuleHistory => "History settings:".to_string(),
            Message::PromptHistoryLimit => "Runs shown by default".to_string(),
            Message::ConfigModuleDiary => "Diary settings:".to_string(),
            Message::PromptStatsWindow => "Entries used for mood statistics".to_string(),
            Message::ConfigModuleRoulette => "Roulette settings:".to_string(),
            Message::PromptDisplaySpins => "Display spins before the pick".to_string(),

            // === GENERAL MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };
        write!(f, "{}", text)
    }
}
