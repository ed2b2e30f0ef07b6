/// Custom actions for MenuItem entities beyond plain patching.
#[derive(Debug, Clone)]
pub enum MenuItemAction {
    /// Marks the item as orderable or sold out.
    SetAvailability(bool),
}

/// Results from MenuItemActions - variants match 1:1 with MenuItemAction
#[derive(Debug, Clone)]
pub enum MenuItemActionResult {
    Availability { changed: bool, is_available: bool },
}
