use waveshare_rp2040_zero::hal::rom_data;

use rusty_orbit::software::remap::ConfigStore;

/// User config in the last 4K sector of the 2M flash.
/// A magic word tags the sector, a blank chip therefore reads as the defaults.
const FLASH_ORIGIN: u32 = 0x1000_0000;
const SECTOR_SIZE: u32 = 4096;
const PAGE_SIZE: usize = 256;
const CONFIG_OFFSET: u32 = 2 * 1024 * 1024 - SECTOR_SIZE;

const MAGIC: u32 = 0x4f52_4254; // "ORBT"
const BLOCK_ERASE_CMD: u8 = 0xD8;

pub struct FlashStore;

impl FlashStore {
    pub fn new() -> Self {
        FlashStore
    }
}

impl ConfigStore for FlashStore {
    fn read(&mut self) -> u32 {
        let ptr = (FLASH_ORIGIN + CONFIG_OFFSET) as *const u32;
        let (magic, raw) = unsafe { (ptr.read_volatile(), ptr.add(1).read_volatile()) };

        if magic == MAGIC {
            raw
        } else {
            0
        }
    }

    fn write(&mut self, raw: u32) {
        let mut page = [0xFFu8; PAGE_SIZE];
        page[..4].copy_from_slice(&MAGIC.to_le_bytes());
        page[4..8].copy_from_slice(&raw.to_le_bytes());

        cortex_m::interrupt::free(|_| unsafe { write_page(CONFIG_OFFSET, &page) });
    }
}

impl Default for FlashStore {
    fn default() -> Self {
        FlashStore::new()
    }
}

/// Runs from RAM: XIP is down between exit and re-enter, nothing here may
/// fetch from flash.
#[inline(never)]
#[link_section = ".data.flash_write"]
unsafe fn write_page(offset: u32, page: &[u8; PAGE_SIZE]) {
    rom_data::connect_internal_flash();
    rom_data::flash_exit_xip();
    rom_data::flash_range_erase(offset, SECTOR_SIZE as usize, SECTOR_SIZE, BLOCK_ERASE_CMD);
    rom_data::flash_range_program(offset, page.as_ptr(), page.len());
    rom_data::flash_flush_cache();
    rom_data::flash_enter_cmd_xip();
}
