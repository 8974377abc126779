/*
Circular Delay Line
===================

A fixed-capacity ring of samples with two cursors:

  read   where the oldest sample in the active loop lives
  write  where the next sample will be stored

The distance `write - read` is the loop length in samples. Both cursors only
ever move forward by one; they are never reduced on their own, only when used
as an index:

    index = cursor & (capacity - 1)

Masking instead of `%` is why the capacity must be a power of two. The cursors
themselves wrap on integer overflow, which is harmless because any power of
two divides 2^64.

  capacity = 8, read = 6, write = 9 (loop length 3)

    slot:   0   1   2   3   4   5   6   7
                 w               r
            [ ] [W] [ ] [ ] [ ] [ ] [R] [ ]
                                  └─ 6, 7, 0 are the active loop
*/

/// Power-of-two circular buffer with independent read and write cursors.
pub struct DelayLine {
    buffer: Vec<f32>,
    mask: usize,
    read: usize,
    write: usize,
}

impl DelayLine {
    /// Allocates a zeroed line. Panics if `capacity` is not a power of two.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two(),
            "delay line capacity must be a power of two, got {capacity}"
        );

        Self {
            buffer: vec![0.0; capacity],
            mask: capacity - 1,
            read: 0,
            write: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Distance between the write and read cursors.
    pub fn len(&self) -> usize {
        self.write.wrapping_sub(self.read)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Place the write cursor `length` samples ahead of the read cursor.
    pub fn set_length(&mut self, length: usize) {
        assert!(
            length <= self.capacity(),
            "loop length {length} exceeds delay line capacity {}",
            self.capacity()
        );
        self.write = self.read.wrapping_add(length);
    }

    #[inline]
    pub fn read_index(&self) -> usize {
        self.read & self.mask
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write & self.mask
    }

    /// Sample under the read cursor.
    #[inline]
    pub fn read(&self) -> f32 {
        self.buffer[self.read_index()]
    }

    /// Sample most recently written, one slot behind the write cursor.
    #[inline]
    pub fn previous_write(&self) -> f32 {
        self.buffer[self.write.wrapping_sub(1) & self.mask]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        let index = self.write_index();
        self.buffer[index] = sample;
    }

    /// Move both cursors forward by one sample.
    #[inline]
    pub fn advance(&mut self) {
        self.read = self.read.wrapping_add(1);
        self.write = self.write.wrapping_add(1);
    }

    /// Sample `offset` slots past the read cursor.
    #[inline]
    pub fn peek(&self, offset: usize) -> f32 {
        self.buffer[self.read.wrapping_add(offset) & self.mask]
    }

    /// Overwrite the sample `offset` slots past the read cursor.
    #[inline]
    pub fn poke(&mut self, offset: usize, sample: f32) {
        let index = self.read.wrapping_add(offset) & self.mask;
        self.buffer[index] = sample;
    }

    /// Overwrite the `len` slots starting at the read cursor.
    pub fn fill_from_read(&mut self, len: usize, mut sample: impl FnMut(usize) -> f32) {
        for i in 0..len {
            let index = self.read.wrapping_add(i) & self.mask;
            self.buffer[index] = sample(i);
        }
    }

    /// Largest absolute sample in the active loop.
    pub fn peak(&self) -> f32 {
        (0..self.len().min(self.capacity()))
            .map(|i| self.peek(i).abs())
            .fold(0.0, f32::max)
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.read = 0;
        self.write = 0;
    }
}
