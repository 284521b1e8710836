//! RTS frame de-obfuscation, checksum and field layout
//!
//! A frame is 56 bits, sent most significant bit first:
//!
//! ```text
//!  55      48 47   44 43   40 39            24 23                    0
//! +----------+-------+-------+----------------+-----------------------+
//! |   key    | ctrl  | cksum | rolling code   | address (little end.) |
//! +----------+-------+-------+----------------+-----------------------+
//! ```
//!
//! On the air every byte except the top one is obfuscated by XOR with
//! the transmitted value of the byte above it. The checksum is an XOR
//! fold of all fourteen nibbles of the plaintext, which comes out zero
//! when the frame is intact.

/// Bits in a complete frame
pub const FRAME_BITS: u8 = 56;

mod constants {
    pub mod fields {
        /// Encryption key, bits 48..=55
        pub const KEY_SHIFT: u32 = 48;
        pub const KEY_MASK: u64 = 0xff;
        /// Control code, bits 44..=47
        pub const CONTROL_SHIFT: u32 = 44;
        pub const CONTROL_MASK: u64 = 0xf;
        /// Rolling code, bits 24..=39
        pub const ROLLING_SHIFT: u32 = 24;
        pub const ROLLING_MASK: u64 = 0xffff;
    }

    /// Byte mask of the key byte, start of the de-obfuscation chain
    pub const TOP_BYTE_MASK: u64 = 0x00ff_0000_0000_0000;
    /// Number of obfuscated bytes below the key
    pub const CHAINED_BYTES: u32 = 6;
    /// Nibbles covered by the checksum fold
    pub const CHECKSUM_NIBBLES: u32 = 14;
}

/// Button names indexed by control code; codes without a known button
/// combination keep their numeric cN form.
const CONTROL_NAMES: [&str; 16] = [
    "c0", "MY", "UP", "MY+UP", "DOWN", "MY+DOWN", "UP+DOWN", "c7", "PROG", "SUN+FLAG", "FLAG",
    "c11", "c12", "c13", "c14", "c15",
];

/// Human readable name for a control code
pub fn control_name(code: u8) -> &'static str {
    CONTROL_NAMES[(code & 0x0f) as usize]
}

/// Strip the XOR obfuscation from a raw frame value
///
/// Each byte below the top one is XORed with the received (still
/// obfuscated) value of the byte directly above it; the top byte is
/// passed through unchanged.
pub fn deobfuscate(raw: u64) -> u64 {
    let mut value = raw;
    let mut mask = constants::TOP_BYTE_MASK;
    for _ in 0..constants::CHAINED_BYTES {
        value ^= (raw & mask) >> 8;
        mask >>= 8;
    }
    value
}

/// XOR fold of all fourteen nibbles; zero means the checksum holds
pub fn checksum_residue(value: u64) -> u8 {
    let mut residue = 0u8;
    let mut v = value;
    for _ in 0..constants::CHECKSUM_NIBBLES {
        residue ^= (v & 0xf) as u8;
        v >>= 4;
    }
    residue
}

/// The address bytes arrive lowest first; swap the outer two
fn swap_address(plaintext: u64) -> u32 {
    (((plaintext & 0xff) << 16) | (plaintext & 0xff00) | ((plaintext >> 16) & 0xff)) as u32
}

/// Fields of a decoded frame, extracted once after the checksum check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFields {
    /// Obfuscation key byte, changes with every button press
    pub key: u8,
    /// Control code (button combination), see [control_name]
    pub control: u8,
    /// Rolling code, increments with every command
    pub rolling_code: u16,
    /// 24 bit remote address in natural byte order
    pub address: u32,
}

/// A complete received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtsFrame {
    plaintext: u64,
    checksum_residue: u8,
}

impl RtsFrame {
    /// De-obfuscate a raw accumulator value and fold its checksum
    pub fn from_raw(raw: u64) -> Self {
        let plaintext = deobfuscate(raw);
        Self {
            plaintext,
            checksum_residue: checksum_residue(plaintext),
        }
    }

    /// Plaintext frame value (14 hex digits)
    pub fn plaintext(&self) -> u64 {
        self.plaintext
    }

    /// Checksum fold over the plaintext; zero when the frame is intact
    pub fn checksum_residue(&self) -> u8 {
        self.checksum_residue
    }

    /// Whether the checksum holds
    pub fn is_valid(&self) -> bool {
        self.checksum_residue == 0
    }

    /// Extract the frame fields; meaningful only for a valid frame
    pub fn fields(&self) -> FrameFields {
        use constants::fields::*;

        FrameFields {
            key: ((self.plaintext >> KEY_SHIFT) & KEY_MASK) as u8,
            control: ((self.plaintext >> CONTROL_SHIFT) & CONTROL_MASK) as u8,
            rolling_code: ((self.plaintext >> ROLLING_SHIFT) & ROLLING_MASK) as u16,
            address: swap_address(self.plaintext),
        }
    }
}
