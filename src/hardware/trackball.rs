use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

// ADNS-5050 register map, the sensor answers 4us after the address byte
const REG_PRODUCT_ID: u8 = 0x00;
const REG_MOTION: u8 = 0x02;
const REG_DELTA_X: u8 = 0x03;
const REG_DELTA_Y: u8 = 0x04;
const REG_CHIP_RESET: u8 = 0x3A;

const WRITE_BIT: u8 = 0x80;
const PRODUCT_ID: u8 = 0x12;
const RESET_VALUE: u8 = 0x5A;
const MOTION_OCCURRED: u8 = 0x80;
const READ_DELAY_US: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackballError {
    Spi,
    Pin,
    Identity,
}

/// Polls the optical sensor over SPI, one chip select per board.
pub struct Trackball<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI: SpiBus, CS: OutputPin> Trackball<SPI, CS> {
    pub fn new(spi: SPI, cs: CS) -> Self {
        Trackball { spi, cs }
    }

    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), TrackballError> {
        self.write(REG_CHIP_RESET, RESET_VALUE)?;
        delay.delay_ms(55);

        if self.read(REG_PRODUCT_ID, delay)? != PRODUCT_ID {
            return Err(TrackballError::Identity);
        }
        Ok(())
    }

    /// None while the ball is still.
    pub fn motion(&mut self, delay: &mut impl DelayNs) -> Result<Option<(i8, i8)>, TrackballError> {
        if self.read(REG_MOTION, delay)? & MOTION_OCCURRED == 0 {
            return Ok(None);
        }

        let x = self.read(REG_DELTA_X, delay)? as i8;
        let y = self.read(REG_DELTA_Y, delay)? as i8;
        Ok(Some((x, y)))
    }

    fn read(&mut self, register: u8, delay: &mut impl DelayNs) -> Result<u8, TrackballError> {
        self.cs.set_low().map_err(|_| TrackballError::Pin)?;

        let result = (|| {
            self.spi
                .write(&[register])
                .and_then(|_| self.spi.flush())
                .map_err(|_| TrackballError::Spi)?;
            delay.delay_us(READ_DELAY_US);

            let mut buffer = [0u8; 1];
            self.spi
                .read(&mut buffer)
                .map_err(|_| TrackballError::Spi)?;
            Ok(buffer[0])
        })();

        self.cs.set_high().map_err(|_| TrackballError::Pin)?;
        result
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), TrackballError> {
        self.cs.set_low().map_err(|_| TrackballError::Pin)?;

        let result = self
            .spi
            .write(&[register | WRITE_BIT, value])
            .and_then(|_| self.spi.flush())
            .map_err(|_| TrackballError::Spi);

        self.cs.set_high().map_err(|_| TrackballError::Pin)?;
        result
    }
}
