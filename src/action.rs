use crate::error::ToudiError;
use crate::source::{FetchMode, Page};

#[derive(Debug)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Select,

    // Session
    Reload,
    LoadMore,
    PageLoaded {
        mode: FetchMode,
        generation: u64,
        result: Result<Page, ToudiError>,
    },

    // Filters
    NextCategory,
    PrevCategory,

    // Search
    EnterSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    SearchCancel,

    // Popups
    OpenSortPopup,
    OpenCategoryPopup,
    PopupUp,
    PopupDown,
    PopupSelect,
    PopupClose,

    // Polish
    OpenInBrowser,
    OpenCategoryInBrowser,
    YankUrl,

    None,
}
