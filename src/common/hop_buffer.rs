use alloc::{boxed::Box, vec};

/// Collects a stream of input chunks of arbitrary size into consecutive,
/// non-overlapping hops of a fixed size.
pub struct HopBuffer {
    hop: Box<[f32]>,
    // The write index within the current hop
    write_index: usize,
    sample_counter: usize,
}

fn validate_hop_size(hop_size: usize) {
    if hop_size == 0 {
        panic!("Hop size must be greater than 0")
    }
}

impl HopBuffer {
    pub fn new(hop_size: usize) -> Self {
        validate_hop_size(hop_size);
        HopBuffer {
            hop: vec![0.; hop_size].into_boxed_slice(),
            write_index: 0,
            sample_counter: 0,
        }
    }

    /// Discards any partially filled hop.
    pub fn reset(&mut self) {
        self.write_index = 0;
        self.sample_counter = 0;
    }

    pub fn hop_size(&self) -> usize {
        self.hop.len()
    }

    /// The number of samples waiting for the current hop to fill up.
    pub fn buffered_len(&self) -> usize {
        self.write_index
    }

    /// The total number of samples consumed since creation or the last reset.
    pub fn sample_counter(&self) -> usize {
        self.sample_counter
    }

    /// Appends `buffer` to the pending samples, calling `handler` with each
    /// hop that gets completed.
    pub fn process<F>(&mut self, buffer: &[f32], mut handler: F)
    where
        F: FnMut(&[f32]),
    {
        let mut remaining = buffer;
        while !remaining.is_empty() {
            let hop_size = self.hop.len();
            let count = remaining.len().min(hop_size - self.write_index);
            self.hop[self.write_index..self.write_index + count]
                .copy_from_slice(&remaining[..count]);
            self.write_index += count;
            self.sample_counter += count;
            remaining = &remaining[count..];

            if self.write_index == hop_size {
                self.write_index = 0;
                handler(&self.hop);
            }
        }
    }
}
