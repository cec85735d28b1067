//! Live horizontal drag offset shared by the active card and the cards behind it.
//!
//! One [`DragWriter`] exists per deck and is owned by the active card's motion.
//! Any number of [`DragReader`]s observe the value. The cell is a plain atomic:
//! the value is continuous, so readers never need a consistent snapshot of
//! anything else.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

/// Creates a cell at rest and returns its only writer plus a first reader.
pub fn drag_signal() -> (DragWriter, DragReader) {
    let cell = Arc::new(AtomicU32::new(0f32.to_bits()));
    (
        DragWriter {
            cell: Arc::clone(&cell),
        },
        DragReader { cell },
    )
}

/// Single writer. Intentionally not `Clone`.
#[derive(Debug)]
pub struct DragWriter {
    cell: Arc<AtomicU32>,
}

impl DragWriter {
    pub fn set(&self, x: f32) {
        let x = if x.is_finite() { x } else { 0.0 };
        self.cell.store(x.to_bits(), Ordering::Release);
    }

    pub fn reset(&self) {
        self.cell.store(0f32.to_bits(), Ordering::Release);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.cell.load(Ordering::Acquire))
    }

    pub fn reader(&self) -> DragReader {
        DragReader {
            cell: Arc::clone(&self.cell),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DragReader {
    cell: Arc<AtomicU32>,
}

impl DragReader {
    pub fn get(&self) -> f32 {
        f32::from_bits(self.cell.load(Ordering::Acquire))
    }

    pub fn is_at_rest(&self) -> bool {
        self.get() == 0.0
    }

    /// `|x|` normalised against `travel`, clamped to `0..=1`.
    pub fn progress(&self, travel: f32) -> f32 {
        advance_progress(self.get(), travel)
    }
}

pub fn advance_progress(x: f32, travel: f32) -> f32 {
    if travel <= 0.0 || !travel.is_finite() {
        return if x == 0.0 { 0.0 } else { 1.0 };
    }
    (x.abs() / travel).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_observe_writer() {
        let (writer, reader) = drag_signal();
        let second = writer.reader();

        writer.set(-42.5);
        assert_eq!(reader.get(), -42.5);
        assert_eq!(second.get(), -42.5);

        writer.reset();
        assert!(reader.is_at_rest());
    }

    #[test]
    fn non_finite_writes_collapse_to_rest() {
        let (writer, reader) = drag_signal();
        writer.set(f32::NAN);
        assert!(reader.is_at_rest());
    }

    #[test]
    fn progress_is_symmetric_and_clamped() {
        assert_eq!(advance_progress(0.0, 200.0), 0.0);
        assert_eq!(advance_progress(100.0, 200.0), 0.5);
        assert_eq!(advance_progress(-100.0, 200.0), 0.5);
        assert_eq!(advance_progress(900.0, 200.0), 1.0);
    }

    #[test]
    fn reader_is_usable_from_another_thread() {
        let (writer, reader) = drag_signal();
        writer.set(12.0);
        let seen = std::thread::spawn(move || reader.get())
            .join()
            .expect("reader thread");
        assert_eq!(seen, 12.0);
    }
}
