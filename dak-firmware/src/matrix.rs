use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

/// A switch position in the matrix. Orders by row then column, the order switches are processed
/// within a scan tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixPos {
    row: u8,
    col: u8,
}
impl MatrixPos {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn row(&self) -> usize {
        self.row as usize
    }

    pub fn column(&self) -> usize {
        self.col as usize
    }

    pub fn is_within<const ROWS: usize, const COLS: usize>(&self) -> bool {
        self.row() < ROWS && self.column() < COLS
    }
}

/// Source of raw switch samples, read once per scan tick.
pub trait SwitchMatrix<const ROWS: usize, const COLS: usize> {
    /// Fill `raw` with the electrical state of every switch; `true` means closed.
    fn scan(&mut self, raw: &mut [[bool; COLS]; ROWS]);
}

/// Stable switch state as seen by the key resolver.
pub trait SwitchState {
    fn is_pressed(&self, pos: MatrixPos) -> bool;
}

impl<const ROWS: usize, const COLS: usize> SwitchState for [[bool; COLS]; ROWS] {
    fn is_pressed(&self, pos: MatrixPos) -> bool {
        self.get(pos.row())
            .and_then(|r| r.get(pos.column()))
            .copied()
            .unwrap_or(false)
    }
}

/// Row-driven switch matrix. Each row output is pulled low in turn and every column input that
/// reads low has its switch closed.
pub struct PinMatrix<I: InputPin, O: OutputPin, D: DelayNs, const ROWS: usize, const COLS: usize> {
    rows: [O; ROWS],
    columns: [I; COLS],
    delay: D,
    settle_us: u32,
}

impl<I: InputPin, O: OutputPin, D: DelayNs, const ROWS: usize, const COLS: usize>
    PinMatrix<I, O, D, ROWS, COLS>
{
    pub fn new(mut rows: [O; ROWS], columns: [I; COLS], delay: D) -> Self {
        for row in rows.iter_mut() {
            let _ = row.set_high();
        }
        Self {
            rows,
            columns,
            delay,
            settle_us: 10,
        }
    }

    /// Time to wait after driving a row before reading the columns.
    pub fn settle_time_us(mut self, us: u32) -> Self {
        self.settle_us = us;
        self
    }
}

impl<I: InputPin, O: OutputPin, D: DelayNs, const ROWS: usize, const COLS: usize>
    SwitchMatrix<ROWS, COLS> for PinMatrix<I, O, D, ROWS, COLS>
{
    fn scan(&mut self, raw: &mut [[bool; COLS]; ROWS]) {
        for (row_pin, raw_row) in self.rows.iter_mut().zip(raw.iter_mut()) {
            let _ = row_pin.set_low();
            self.delay.delay_us(self.settle_us);
            for (col_pin, sample) in self.columns.iter_mut().zip(raw_row.iter_mut()) {
                *sample = col_pin.is_low().unwrap_or(false);
            }
            let _ = row_pin.set_high();
        }
    }
}

#[cfg(test)]
#[path = "matrix_test.rs"]
mod test;
