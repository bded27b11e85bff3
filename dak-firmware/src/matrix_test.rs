extern crate std;

use core::{cell::RefCell, convert::Infallible};
use embedded_hal::digital::ErrorType;
use std::{rc::Rc, vec, vec::Vec};

use super::*;

#[derive(Debug)]
struct KeyMatrixInner {
    switches: Vec<Vec<bool>>,
    driven_row: Option<usize>,
    delays: usize,
}

/// Simulated wiring: a column reads low while its switch is closed and its row is driven low.
#[derive(Clone)]
struct KeyMatrix(Rc<RefCell<KeyMatrixInner>>);
impl KeyMatrix {
    fn new(rows: usize, cols: usize) -> Self {
        Self(Rc::new(RefCell::new(KeyMatrixInner {
            switches: vec![vec![false; cols]; rows],
            driven_row: None,
            delays: 0,
        })))
    }

    fn set_switch(&self, row: usize, col: usize, is_down: bool) {
        self.0.borrow_mut().switches[row][col] = is_down;
    }
}

struct RowPin(KeyMatrix, usize);
impl ErrorType for RowPin {
    type Error = Infallible;
}
impl OutputPin for RowPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0 .0.borrow_mut().driven_row = Some(self.1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut inner = self.0 .0.borrow_mut();
        if inner.driven_row == Some(self.1) {
            inner.driven_row = None;
        }
        Ok(())
    }
}

struct ColumnPin(KeyMatrix, usize);
impl ErrorType for ColumnPin {
    type Error = Infallible;
}
impl InputPin for ColumnPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let inner = self.0 .0.borrow();
        Ok(inner
            .driven_row
            .map(|r| inner.switches[r][self.1])
            .unwrap_or(false))
    }
}

struct CountingDelay(KeyMatrix);
impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, _ns: u32) {
        self.0 .0.borrow_mut().delays += 1;
    }
}

fn pin_matrix(km: &KeyMatrix) -> PinMatrix<ColumnPin, RowPin, CountingDelay, 3, 2> {
    PinMatrix::new(
        [0, 1, 2].map(|r| RowPin(km.clone(), r)),
        [0, 1].map(|c| ColumnPin(km.clone(), c)),
        CountingDelay(km.clone()),
    )
}

#[test]
fn scan_reads_closed_switches() {
    let km = KeyMatrix::new(3, 2);
    let mut matrix = pin_matrix(&km);
    let mut raw = [[false; 2]; 3];

    km.set_switch(1, 0, true);
    km.set_switch(2, 1, true);
    matrix.scan(&mut raw);

    assert_eq!(raw, [[false, false], [true, false], [false, true]]);
    assert_eq!(km.0.borrow().driven_row, None);
    assert_eq!(km.0.borrow().delays, 3);

    km.set_switch(1, 0, false);
    matrix.scan(&mut raw);
    assert_eq!(raw, [[false, false], [false, false], [false, true]]);
}

#[test]
fn matrix_pos_order() {
    let a = MatrixPos::new(0, 5);
    let b = MatrixPos::new(1, 0);
    assert!(a < b);
    assert!(MatrixPos::new(1, 1) > b);
    assert!(b.is_within::<2, 1>());
    assert!(!a.is_within::<2, 5>());
}

#[test]
fn raw_snapshot_as_switch_state() {
    let raw = [[false, true], [false, false]];
    assert!(raw.is_pressed(MatrixPos::new(0, 1)));
    assert!(!raw.is_pressed(MatrixPos::new(1, 1)));
    assert!(!raw.is_pressed(MatrixPos::new(5, 1)));
}
