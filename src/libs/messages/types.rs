#[derive(Debug, Clone)]
pub enum Message {
    // === BLOCK MESSAGES ===
    BlockCreated(String),
    BlockUpdated(String),
    BlockDeleted(String),
    BlocksHeader,
    BlockHeader(String, String), // name, type
    BlockHasNoItems,
    NoBlocksFound,
    EditingBlock(String),
    EstimatedTime(String),
    OptionOf(i64),
    ConfirmDeleteBlock(String),
    ConfirmDeleteRoulette(String, usize), // name, option count
    ConfirmReplaceItems(usize),
    ItemsWillBeRecreated,
    EnterSubtasks,
    EnterOptions,
    PromptBlockName,
    PromptBlockType,
    PromptBlockDescription,
    PromptEstimatedMinutes,
    PromptSubtask(usize),
    PromptOption(usize),
    PromptOptionSubtasks,

    // === BLOCK VALIDATION ===
    BlockNameRequired,
    BlockItemsRequired,
    BlockTypeImmutable(String),
    OptionEditedDirectly(i64),
    UnknownBlockType(String),
    InvalidMinutes(String),
    BlockIdRequired,

    // === ROULETTE MESSAGES ===
    RouletteWinner(String, i64),
    RouletteIdRequired,
    NotARoulette(String),
    RouletteNotRunnable(String),

    // === EXECUTION MESSAGES ===
    ExecutionStarted(String),
    ExecutionProgress(usize, usize), // done, total
    ExecutionCompleted(String),
    ExecutionCompletedPartially(String),
    ExecutionAbandoned(i64),
    ExecutionLeftOpen(i64),
    ExecutionAlreadyCompleted(i64),
    ExecutionNotFound(i64),
    ExecutionHeader(String, String), // block name, status
    SubtaskIndexOutOfRange { index: usize, total: usize },
    DuplicateSubtask(i64),
    EventWithoutBlock(i64),
    PromptTickSubtasks,
    ConfirmFinishExecution,
    ConfirmAbandonExecution,
    NoSubtaskStatuses,

    // === HISTORY MESSAGES ===
    HistoryHeader,
    OpenExecutionsHeader,
    NoHistory,
    NoOpenExecutions,
    WeeklyStreak(usize),

    // === DIARY MESSAGES ===
    DiaryEntrySaved(String),
    DiaryEntryDeleted(String),
    DiaryHeader,
    NoDiaryEntries,
    MoodStatsHeader(usize),
    MoodOutOfRange(u8),
    ConfirmDeleteEntry(String),
    PromptMood,
    PromptNotes,

    // === TAG MESSAGES ===
    EntryTagged(String, String),   // date, tag
    EntryUntagged(String, String), // date, tag
    EntryNotTagged(String, String),
    TagListHeader,
    NoTagsFound,
    TagNameRequired,

    // === CALENDAR MESSAGES ===
    EventCreated(String, i64),
    EventDeleted(i64),
    EventNotFound(i64),
    EventHeader(String, String), // title, start
    EventTitleRequired,
    EventEndsBeforeStart,
    AssignedBlockMissing(i64),
    UnknownEventType(String),
    AgendaHeader(String),
    NothingScheduled(String),
    HolidaySaved(String, String), // name, date
    HolidayDeleted(String),
    HolidaysHeader,
    NoHolidays,
    HolidayNameRequired,
    InvalidDate(String),
    InvalidDateTime(String),

    // === ACCOUNT MESSAGES ===
    SignedUp(String),
    SignedIn(String),
    SignedInAs(String, String), // email, since
    SignedOut,
    NotSignedIn,
    InvalidCredentials,
    InvalidEmail(String),
    EmailTaken(String),
    PasswordRequired,
    PasswordMismatch,
    PromptEmail,
    PromptDisplayName,
    PromptPassword,
    PromptPasswordConfirm,

    // === DATABASE MESSAGES ===
    DatabaseReady(String),
    SchemaVersion(u32, u32), // current, latest
    NoOrphansFound,
    OrphansFound(usize),
    OrphansRemoved(usize),
    QueryReturnedNoRows,
    StatementApplied(usize, i64), // changes, last inserted id

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    PromptSelectModules,
    ConfigModuleDatabase,
    PromptDatabaseFileName,
    ConfigModuleHistory,
    PromptHistoryLimit,
    ConfigModuleDiary,
    PromptStatsWindow,
    ConfigModuleRoulette,
    PromptDisplaySpins,

    // === GENERAL MESSAGES ===
    OperationCancelled,
}
