//! Seat map engine.
//!
//! Seats are never stored as entities. The seat universe is derived from the
//! grid dimensions, and a seat's status is a projection over two sets:
//!
//! ```text
//! status(seat) = Booked    if seat ∈ booked
//!              = Selected  if seat ∈ selected
//!              = Available otherwise
//! ```
//!
//! Booked wins over Selected, so stale client state can never show a
//! server-booked seat as the user's.

use crate::error::{Field, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Row labels of the default auditorium
pub const DEFAULT_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Seats per row of the default auditorium
pub const DEFAULT_SEATS_PER_ROW: u8 = 10;

/// Seats the demo backend reports as already booked
pub const DEMO_BOOKED_SEATS: [&str; 8] = ["A3", "A4", "B5", "C2", "C7", "D8", "E4", "F6"];

/// Seat identifier: row letter followed by a 1-based column (`"A1"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(String);

impl SeatId {
    /// Builds the id for `row` and 1-based `column`
    #[must_use]
    pub fn new(row: char, column: u8) -> Self {
        Self(format!("{}{column}", row.to_ascii_uppercase()))
    }

    /// The id as displayed
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Row letter
    #[must_use]
    pub fn row(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SeatId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let invalid = || ValidationError::new(Field::Seats, format!("Invalid seat '{s}'"));

        let row = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?;
        let column: u8 = chars.as_str().parse().map_err(|_| invalid())?;
        if column == 0 {
            return Err(invalid());
        }
        Ok(Self::new(row, column))
    }
}

/// Projected status of one seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Free to select
    Available,
    /// In the user's selection
    Selected,
    /// Unavailable for selection
    Booked,
}

/// Seats the backend reports as unavailable; static for a session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookedSeats(HashSet<SeatId>);

impl BookedSeats {
    /// The demo backend's booked list
    #[must_use]
    pub fn demo() -> Self {
        DEMO_BOOKED_SEATS
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect()
    }

    /// Whether `seat` is booked
    #[must_use]
    pub fn contains(&self, seat: &SeatId) -> bool {
        self.0.contains(seat)
    }

    /// Number of booked seats
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is booked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<SeatId> for BookedSeats {
    fn from_iter<I: IntoIterator<Item = SeatId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Every seat of a `rows × seats_per_row` grid, row-major, columns ascending
#[must_use]
pub fn seat_universe(rows: &[char], seats_per_row: u8) -> Vec<SeatId> {
    rows.iter()
        .flat_map(|&row| (1..=seats_per_row).map(move |column| SeatId::new(row, column)))
        .collect()
}

/// Status of `seat` against the booked set and the user's selection
#[must_use]
pub fn status(seat: &SeatId, booked: &BookedSeats, selected: &[SeatId]) -> SeatStatus {
    if booked.contains(seat) {
        SeatStatus::Booked
    } else if selected.contains(seat) {
        SeatStatus::Selected
    } else {
        SeatStatus::Available
    }
}

/// Toggles `seat` in the selection
///
/// Booked seats are ignored. Otherwise the seat is removed if present, or
/// appended at the end; the order of the other seats is kept.
#[must_use]
pub fn toggle(seat: &SeatId, selected: &[SeatId], booked: &BookedSeats) -> Vec<SeatId> {
    if booked.contains(seat) {
        return selected.to_vec();
    }
    if selected.contains(seat) {
        selected.iter().filter(|s| *s != seat).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(seat.clone());
        next
    }
}

/// `count(selected) * unit_price`
#[must_use]
pub fn total_price(selected: &[SeatId], unit_price: u64) -> u64 {
    let count = u64::try_from(selected.len()).unwrap_or(u64::MAX);
    count.saturating_mul(unit_price)
}

/// One rendered row of the seat map
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatRow {
    /// Row letter
    pub label: char,
    /// Seats of the row with their status, columns ascending
    pub seats: Vec<(SeatId, SeatStatus)>,
}

/// Fixed seat grid of the auditorium
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatGrid {
    rows: Vec<char>,
    seats_per_row: u8,
}

impl SeatGrid {
    /// Creates a grid; row labels are upper-cased and de-duplicated in order
    #[must_use]
    pub fn new(rows: impl IntoIterator<Item = char>, seats_per_row: u8) -> Self {
        let mut unique = Vec::new();
        for row in rows.into_iter().filter(char::is_ascii_alphabetic) {
            let row = row.to_ascii_uppercase();
            if !unique.contains(&row) {
                unique.push(row);
            }
        }
        Self {
            rows: unique,
            seats_per_row,
        }
    }

    /// Row labels in order
    #[must_use]
    pub fn rows(&self) -> &[char] {
        &self.rows
    }

    /// Seats per row
    #[must_use]
    pub const fn seats_per_row(&self) -> u8 {
        self.seats_per_row
    }

    /// Total number of seats
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rows.len() * usize::from(self.seats_per_row)
    }

    /// All seat ids of this grid
    #[must_use]
    pub fn universe(&self) -> Vec<SeatId> {
        seat_universe(&self.rows, self.seats_per_row)
    }

    /// Whether `seat` belongs to this grid
    #[must_use]
    pub fn contains(&self, seat: &SeatId) -> bool {
        let column: Option<u8> = seat.as_str().get(1..).and_then(|c| c.parse().ok());
        matches!(
            (seat.row(), column),
            (Some(row), Some(column))
                if self.rows.contains(&row) && (1..=self.seats_per_row).contains(&column)
        )
    }

    /// The grid with every seat's status
    #[must_use]
    pub fn layout(&self, booked: &BookedSeats, selected: &[SeatId]) -> Vec<SeatRow> {
        self.rows
            .iter()
            .map(|&label| SeatRow {
                label,
                seats: (1..=self.seats_per_row)
                    .map(|column| {
                        let seat = SeatId::new(label, column);
                        let status = status(&seat, booked, selected);
                        (seat, status)
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for SeatGrid {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_SEATS_PER_ROW)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    #[test]
    fn universe_is_row_major() {
        let seats = seat_universe(&['A', 'B'], 3);
        let ids: Vec<&str> = seats.iter().map(SeatId::as_str).collect();
        assert_eq!(ids, ["A1", "A2", "A3", "B1", "B2", "B3"]);
    }

    #[test]
    fn default_grid_has_eighty_seats() {
        let grid = SeatGrid::default();
        assert_eq!(grid.capacity(), 80);
        assert_eq!(grid.universe().len(), 80);
        assert_eq!(grid.universe().last().unwrap().as_str(), "H10");
    }

    #[test]
    fn booked_takes_priority_over_selected() {
        let booked = BookedSeats::demo();
        let selected = vec![seat("A3"), seat("A1")];

        assert_eq!(status(&seat("A3"), &booked, &selected), SeatStatus::Booked);
        assert_eq!(status(&seat("A1"), &booked, &selected), SeatStatus::Selected);
        assert_eq!(status(&seat("A2"), &booked, &selected), SeatStatus::Available);
    }

    #[test]
    fn toggle_appends_and_removes() {
        let booked = BookedSeats::demo();
        let selected = toggle(&seat("A1"), &[], &booked);
        let selected = toggle(&seat("A2"), &selected, &booked);
        let selected = toggle(&seat("A1"), &selected, &booked);
        assert_eq!(selected, vec![seat("A2")]);
    }

    #[test]
    fn toggle_ignores_booked_seats() {
        let booked = BookedSeats::demo();
        let selected = vec![seat("B1")];
        assert_eq!(toggle(&seat("B5"), &selected, &booked), selected);
    }

    #[test]
    fn total_is_count_times_unit() {
        assert_eq!(total_price(&[seat("A1"), seat("A2")], 50), 100);
        assert_eq!(total_price(&[], 50), 0);
    }

    #[test]
    fn seat_ids_parse_strictly() {
        assert_eq!(seat("c7").as_str(), "C7");
        assert!("7C".parse::<SeatId>().is_err());
        assert!("A0".parse::<SeatId>().is_err());
        assert!("".parse::<SeatId>().is_err());
    }

    #[test]
    fn grid_membership() {
        let grid = SeatGrid::default();
        assert!(grid.contains(&seat("H10")));
        assert!(!grid.contains(&seat("H11")));
        assert!(!grid.contains(&seat("J1")));
    }

    #[test]
    fn grid_dedups_rows() {
        let grid = SeatGrid::new("aAbB".chars(), 2);
        assert_eq!(grid.rows(), &['A', 'B']);
    }

    #[test]
    fn layout_projects_status() {
        let grid = SeatGrid::new(['A'], 4);
        let booked: BookedSeats = [seat("A3")].into_iter().collect();
        let rows = grid.layout(&booked, &[seat("A1")]);

        let statuses: Vec<SeatStatus> = rows[0].seats.iter().map(|(_, s)| *s).collect();
        assert_eq!(
            statuses,
            [
                SeatStatus::Selected,
                SeatStatus::Available,
                SeatStatus::Booked,
                SeatStatus::Available
            ]
        );
    }
}
