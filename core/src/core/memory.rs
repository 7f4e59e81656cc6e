//! Paged view of the Z80's 64 KiB address space.
//!
//! Every page has an independent read window and write window into a
//! host-owned [`Bank`]. Pages the host never mapped read from an all-ones page
//! and write into a scratch page, both owned by the pager, so any address is
//! always accessible.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;

use tracing::trace;

/// Size of the Z80 address space.
pub const ADDRESS_SPACE: usize = 0x10000;

/// Value read from unmapped memory.
pub const UNMAPPED_FILL: u8 = 0xFF;

/// Default page granularity.
pub const DEFAULT_PAGE_SIZE: usize = 0x400;

/// A host-owned block of emulated memory.
///
/// Cloning a `Bank` clones the handle, not the bytes: the same bank can back
/// several pages, several CPUs, or stay in the host for direct inspection.
#[derive(Clone, Debug)]
pub struct Bank(Rc<RefCell<Box<[u8]>>>);

impl Bank {
    /// Zero-filled bank of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self::filled(len, 0)
    }

    pub fn filled(len: usize, value: u8) -> Self {
        Self::from_vec(vec![value; len])
    }

    pub fn from_vec(data: Vec<u8>) -> Self {
        Self(Rc::new(RefCell::new(data.into_boxed_slice())))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, offset: usize) -> u8 {
        self.0.borrow()[offset]
    }

    #[inline]
    pub fn set(&self, offset: usize, value: u8) {
        self.0.borrow_mut()[offset] = value;
    }

    /// Copy `data` into the bank starting at `offset`.
    pub fn load(&self, offset: usize, data: &[u8]) {
        self.0.borrow_mut()[offset..offset + data.len()].copy_from_slice(data);
    }

    /// True if both handles refer to the same storage.
    pub fn same_storage(&self, other: &Bank) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug)]
struct Window {
    bank: Bank,
    base: usize,
}

impl Window {
    fn new(bank: &Bank, base: usize) -> Self {
        Self {
            bank: bank.clone(),
            base,
        }
    }
}

#[derive(Clone, Debug)]
struct Page {
    read: Window,
    write: Window,
}

/// Page table mapping the 16-bit address space onto host banks.
#[derive(Clone, Debug)]
pub struct MemoryPager {
    pages: Vec<Page>,
    page_size: usize,
    shift: u32,
    mask: usize,
    fill: Bank,
    sink: Bank,
}

impl Default for MemoryPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl MemoryPager {
    /// Create a pager with every page unmapped.
    ///
    /// `page_size` must be a power of two between 256 and 64 KiB.
    pub fn new(page_size: usize) -> Self {
        assert!(
            page_size.is_power_of_two() && (0x100..=ADDRESS_SPACE).contains(&page_size),
            "page size must be a power of two in 256..=65536, got {page_size:#X}"
        );
        let fill = Bank::filled(page_size, UNMAPPED_FILL);
        let sink = Bank::new(page_size);
        let unmapped = Page {
            read: Window::new(&fill, 0),
            write: Window::new(&sink, 0),
        };
        Self {
            pages: vec![unmapped; ADDRESS_SPACE / page_size],
            page_size,
            shift: page_size.trailing_zeros(),
            mask: page_size - 1,
            fill,
            sink,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Index of the page containing `addr`.
    pub fn page_of(&self, addr: u16) -> usize {
        addr as usize >> self.shift
    }

    /// True if reads of `addr` come from a host bank.
    pub fn is_read_mapped(&self, addr: u16) -> bool {
        !self.pages[self.page_of(addr)].read.bank.same_storage(&self.fill)
    }

    /// True if writes to `addr` land in a host bank.
    pub fn is_write_mapped(&self, addr: u16) -> bool {
        !self.pages[self.page_of(addr)].write.bank.same_storage(&self.sink)
    }

    // --- Mapping ---

    /// Map `bank[offset..offset + size]` read-only at `addr`. Writes to the
    /// range keep going wherever they went before (discarded by default).
    pub fn map_rom(&mut self, addr: usize, size: usize, bank: &Bank, offset: usize) {
        self.check_range(addr, size);
        Self::check_bank(bank, offset, size);
        trace!(addr, size, offset, "map rom");
        let page_size = self.page_size;
        for (i, page) in self.pages_in(addr, size).enumerate() {
            page.read = Window::new(bank, offset + i * page_size);
        }
    }

    /// Map `bank[offset..offset + size]` write-only at `addr`. Reads keep
    /// their previous mapping (the unmapped fill by default).
    pub fn map_wom(&mut self, addr: usize, size: usize, bank: &Bank, offset: usize) {
        self.check_range(addr, size);
        Self::check_bank(bank, offset, size);
        trace!(addr, size, offset, "map wom");
        let page_size = self.page_size;
        for (i, page) in self.pages_in(addr, size).enumerate() {
            page.write = Window::new(bank, offset + i * page_size);
        }
    }

    /// Map `bank[offset..offset + size]` read/write at `addr`.
    pub fn map_ram(&mut self, addr: usize, size: usize, bank: &Bank, offset: usize) {
        self.map_ram_split(addr, size, bank, offset, bank, offset);
    }

    /// Map RAM with independent read and write windows (e.g. shadow RAM
    /// under ROM, or a write-through copy).
    pub fn map_ram_split(
        &mut self,
        addr: usize,
        size: usize,
        read: &Bank,
        read_offset: usize,
        write: &Bank,
        write_offset: usize,
    ) {
        self.check_range(addr, size);
        Self::check_bank(read, read_offset, size);
        Self::check_bank(write, write_offset, size);
        trace!(addr, size, read_offset, write_offset, "map ram");
        let page_size = self.page_size;
        for (i, page) in self.pages_in(addr, size).enumerate() {
            page.read = Window::new(read, read_offset + i * page_size);
            page.write = Window::new(write, write_offset + i * page_size);
        }
    }

    /// Restore the unmapped read source for the range.
    pub fn unmap_rom(&mut self, addr: usize, size: usize) {
        self.check_range(addr, size);
        trace!(addr, size, "unmap rom");
        let fill = self.fill.clone();
        for page in self.pages_in(addr, size) {
            page.read = Window::new(&fill, 0);
        }
    }

    /// Restore the discarding write destination for the range.
    pub fn unmap_wom(&mut self, addr: usize, size: usize) {
        self.check_range(addr, size);
        trace!(addr, size, "unmap wom");
        let sink = self.sink.clone();
        for page in self.pages_in(addr, size) {
            page.write = Window::new(&sink, 0);
        }
    }

    pub fn unmap_ram(&mut self, addr: usize, size: usize) {
        self.unmap_rom(addr, size);
        self.unmap_wom(addr, size);
    }

    fn pages_in(&mut self, addr: usize, size: usize) -> impl Iterator<Item = &mut Page> {
        let first = addr >> self.shift;
        let count = size >> self.shift;
        self.pages[first..first + count].iter_mut()
    }

    fn check_range(&self, addr: usize, size: usize) {
        assert!(
            addr & self.mask == 0 && size & self.mask == 0,
            "mapping {addr:#06X}+{size:#X} is not aligned to the {:#X} page size",
            self.page_size
        );
        assert!(
            addr + size <= ADDRESS_SPACE,
            "mapping {addr:#06X}+{size:#X} extends past the address space"
        );
    }

    fn check_bank(bank: &Bank, offset: usize, size: usize) {
        assert!(
            offset + size <= bank.len(),
            "bank of {:#X} bytes cannot back {size:#X} bytes at offset {offset:#X}",
            bank.len()
        );
    }

    // --- Access ---

    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        let page = &self.pages[addr as usize >> self.shift];
        page.read.bank.get(page.read.base + (addr as usize & self.mask))
    }

    #[inline]
    pub fn poke(&self, addr: u16, value: u8) {
        let page = &self.pages[addr as usize >> self.shift];
        page.write.bank.set(page.write.base + (addr as usize & self.mask), value);
    }

    /// Little-endian word read; the high byte wraps from 0xFFFF to 0x0000.
    pub fn peek16(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.peek(addr), self.peek(addr.wrapping_add(1))])
    }

    pub fn poke16(&self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.poke(addr, lo);
        self.poke(addr.wrapping_add(1), hi);
    }

    /// Copy a buffer into emulated memory through the write mapping,
    /// wrapping at the end of the address space.
    pub fn load(&self, addr: u16, data: &[u8]) {
        let mut a = addr;
        for &byte in data {
            self.poke(a, byte);
            a = a.wrapping_add(1);
        }
    }

    /// Copy `len` bytes starting at `addr` (as the CPU would read them).
    pub fn read_block(&self, addr: u16, len: usize) -> Vec<u8> {
        (0..len).map(|i| self.peek(addr.wrapping_add(i as u16))).collect()
    }

    /// Write `len` bytes of emulated memory to `out`.
    pub fn dump<W: Write>(&self, addr: u16, len: usize, out: &mut W) -> io::Result<()> {
        out.write_all(&self.read_block(addr, len))
    }

    pub fn dump_to_file(&self, addr: u16, len: usize, path: impl AsRef<Path>) -> io::Result<()> {
        let mut file = io::BufWriter::new(std::fs::File::create(path)?);
        self.dump(addr, len, &mut file)?;
        file.flush()
    }
}
