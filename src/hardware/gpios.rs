use cortex_m::delay::Delay;
use heapless::Vec;
use waveshare_rp2040_zero as bsp;

use bsp::hal::gpio::{DynPinId, FunctionSio, Pin, PullDown, SioInput, SioOutput};
use embedded_hal::digital::*;

/// Activates the columns one by one and checks the rows.
/// The index table converts an electrical position into a layout index, the
/// physical grids live next to the layer tables.
pub struct GpiosMatrix<const COLS: usize, const ROWS: usize> {
    pub rows: [Pin<DynPinId, FunctionSio<SioInput>, PullDown>; ROWS],
    pub columns: [Pin<DynPinId, FunctionSio<SioOutput>, PullDown>; COLS],
    pub indexes: &'static [[Option<u8>; ROWS]; COLS],
}

impl<const COLS: usize, const ROWS: usize> GpiosMatrix<COLS, ROWS> {
    pub fn get_active_indexes(&mut self, delay: &mut Delay) -> Vec<u8, 16> {
        let mut output = Vec::new();

        for (index_col, col) in self.columns.iter_mut().enumerate() {
            if col.set_high().is_ok() {
                delay.delay_us(1);
                for (index_row, row) in self.rows.iter_mut().enumerate() {
                    if let Some(layout_index) = self.indexes[index_col][index_row] {
                        if row.is_high().unwrap_or(false) {
                            output.push(layout_index).ok();
                        }
                    }
                }

                col.set_low().ok();
            }
        }

        output
    }
}
