use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::normalize_symbol;
use crate::errors::CoreError;
use crate::models::watchlist::{validate_price, WatchlistEntry};

/// Edits to the local watchlist.
///
/// Pure business logic with no I/O.
pub struct WatchlistService;

impl WatchlistService {
    pub fn new() -> Self {
        Self
    }

    /// Append a new entry after validating its symbol and prices.
    pub fn add_entry(&self, watchlist: &mut Vec<WatchlistEntry>, entry: WatchlistEntry) -> Result<Uuid, CoreError> {
        let entry = self.prepare_entry(watchlist, entry)?;
        let id = entry.id;
        watchlist.push(entry);
        Ok(id)
    }

    /// Normalize and validate an entry without inserting it. An entry created
    /// from a pick is rejected while that pick is still tracked.
    pub fn prepare_entry(&self, watchlist: &[WatchlistEntry], mut entry: WatchlistEntry) -> Result<WatchlistEntry, CoreError> {
        entry.symbol = normalize_symbol(&entry.symbol)?;
        validate_price("entry price", entry.entry_price)?;
        validate_price("target price", entry.target_price)?;
        validate_price("stop loss", entry.stop_loss)?;

        if let Some(pick_id) = &entry.pick_id {
            if self.tracks_pick(watchlist, pick_id) {
                return Err(CoreError::ValidationError(format!(
                    "{} from pick {pick_id} is already on the watchlist",
                    entry.symbol
                )));
            }
        }
        Ok(entry)
    }

    /// A pick is tracked while an active entry refers to it. Closed entries
    /// do not count.
    pub fn tracks_pick(&self, watchlist: &[WatchlistEntry], pick_id: &str) -> bool {
        watchlist
            .iter()
            .any(|e| !e.is_closed() && e.pick_id.as_deref() == Some(pick_id))
    }

    pub fn find<'a>(&self, watchlist: &'a [WatchlistEntry], id: Uuid) -> Result<&'a WatchlistEntry, CoreError> {
        watchlist
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))
    }

    fn find_mut<'a>(&self, watchlist: &'a mut [WatchlistEntry], id: Uuid) -> Result<&'a mut WatchlistEntry, CoreError> {
        watchlist
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))
    }

    /// Fix a mistyped entry price. Active entries only.
    pub fn correct_entry_price(&self, watchlist: &mut [WatchlistEntry], id: Uuid, price: f64) -> Result<(), CoreError> {
        validate_price("entry price", price)?;
        let entry = self.find_mut(watchlist, id)?;
        entry.ensure_active()?;
        entry.entry_price = price;
        Ok(())
    }

    pub fn set_target_price(&self, watchlist: &mut [WatchlistEntry], id: Uuid, price: f64) -> Result<(), CoreError> {
        validate_price("target price", price)?;
        let entry = self.find_mut(watchlist, id)?;
        entry.ensure_active()?;
        entry.target_price = price;
        Ok(())
    }

    pub fn set_stop_loss(&self, watchlist: &mut [WatchlistEntry], id: Uuid, price: f64) -> Result<(), CoreError> {
        validate_price("stop loss", price)?;
        let entry = self.find_mut(watchlist, id)?;
        entry.ensure_active()?;
        entry.stop_loss = price;
        Ok(())
    }

    /// Replace the notes. Allowed on closed entries too.
    pub fn set_notes(&self, watchlist: &mut [WatchlistEntry], id: Uuid, notes: impl Into<String>) -> Result<(), CoreError> {
        let entry = self.find_mut(watchlist, id)?;
        entry.notes = notes.into();
        Ok(())
    }

    /// Lock profits: close the entry at `exit_price`, or at its current price
    /// when none is given.
    pub fn close_entry(
        &self,
        watchlist: &mut [WatchlistEntry],
        id: Uuid,
        exit_price: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<WatchlistEntry, CoreError> {
        let entry = self.find_mut(watchlist, id)?;
        entry.ensure_active()?;
        let price = exit_price.or(entry.current_price).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "No exit price given and no current price known for {}",
                entry.symbol
            ))
        })?;
        entry.close(price, now)?;
        Ok(entry.clone())
    }

    /// Delete an entry outright, whatever its status.
    pub fn remove_entry(&self, watchlist: &mut Vec<WatchlistEntry>, id: Uuid) -> Result<WatchlistEntry, CoreError> {
        let idx = watchlist
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::EntryNotFound(id.to_string()))?;
        Ok(watchlist.remove(idx))
    }
}

impl Default for WatchlistService {
    fn default() -> Self {
        Self::new()
    }
}
