use std::collections::VecDeque;

/// An ordered FIFO of single bits, scoped to one encode or decode call.
///
/// Packing and unpacking are mirror images of each other: the bit stored
/// at position 0 (least significant) of a byte is the first bit out of the
/// queue, position 7 the last. The exact bit sequence drained from the
/// codebook while encoding is therefore reproduced, in order, when the
/// payload bytes are unpacked while decoding.
#[derive(Debug, Default)]
pub struct BitQueue {
    bits: VecDeque<bool>,
}

impl BitQueue {
    pub fn new() -> Self {
        Self { bits: VecDeque::new() }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push_back(bit);
    }

    pub fn pop(&mut self) -> Option<bool> {
        self.bits.pop_front()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Expands `byte` into 8 queued bits, least-significant position first.
    pub fn unpack(&mut self, byte: u8) {
        for position in 0..8 {
            self.bits.push_back(byte & (1 << position) != 0);
        }
    }

    /// Drains 8 bits into a byte, first-popped bit at position 0.
    ///
    /// Returns `None` while fewer than 8 bits are queued; the remainder
    /// stays queued for a later call.
    pub fn pack(&mut self) -> Option<u8> {
        if self.bits.len() < 8 {
            return None;
        }
        let mut byte = 0u8;
        for position in 0..8 {
            if self.bits.pop_front() == Some(true) {
                byte |= 1 << position;
            }
        }
        Some(byte)
    }

    /// Pads with 0 bits until the queue length is a multiple of 8.
    pub fn pad_to_byte(&mut self) {
        while self.bits.len() % 8 != 0 {
            self.bits.push_back(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_is_least_significant_first() {
        let mut queue = BitQueue::new();
        queue.unpack(0b0000_0001);
        assert_eq!(queue.pop(), Some(true));
        for _ in 0..7 {
            assert_eq!(queue.pop(), Some(false));
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn pack_mirrors_unpack() {
        for byte in [0x00, 0x01, 0x80, 0xa5, 0xff, 0x3c] {
            let mut queue = BitQueue::new();
            queue.unpack(byte);
            assert_eq!(queue.pack(), Some(byte));
            assert!(queue.is_empty());
        }
    }

    #[test]
    fn pack_needs_eight_bits() {
        let mut queue = BitQueue::new();
        for _ in 0..7 {
            queue.push(true);
        }
        assert_eq!(queue.pack(), None);
        assert_eq!(queue.len(), 7);

        queue.push(true);
        assert_eq!(queue.pack(), Some(0xff));
        assert!(queue.is_empty());
    }

    #[test]
    fn pack_keeps_the_remainder_queued() {
        let mut queue = BitQueue::new();
        queue.unpack(0xff);
        queue.push(true);
        queue.push(false);

        assert_eq!(queue.pack(), Some(0xff));
        assert_eq!(queue.pack(), None);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn padding_fills_to_a_byte_boundary_with_zeros() {
        let mut queue = BitQueue::new();
        queue.push(true);
        queue.push(true);
        queue.pad_to_byte();
        assert_eq!(queue.len(), 8);
        assert_eq!(queue.pack(), Some(0b0000_0011));

        // already aligned: padding is a no-op
        queue.unpack(0x55);
        queue.pad_to_byte();
        assert_eq!(queue.len(), 8);
    }
}
