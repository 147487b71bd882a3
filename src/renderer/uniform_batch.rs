//! Per-object uniforms packed in one buffer and selected with dynamic offsets.

use crate::context::Context;
use bytemuck::Pod;
use std::marker::PhantomData;
use std::mem;

/// Rounds `size` up to the next multiple of `alignment`.
pub fn aligned_size(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}

/// A uniform buffer holding one `T` per drawn object.
///
/// Entries are pushed in CPU memory during the frame and uploaded with a single
/// `write_buffer` call. Each entry starts on the device's uniform offset alignment, so
/// the offset returned by [`UniformBatch::push`] can be used as a dynamic offset.
pub struct UniformBatch<T: Pod> {
    bytes: Vec<u8>,
    buffer: wgpu::Buffer,
    capacity: u64,
    stride: u64,
    len: usize,
    label: &'static str,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBatch<T> {
    /// Creates a batch with room for `initial_len` entries.
    pub fn new(label: &'static str, initial_len: usize) -> Self {
        let ctxt = Context::get();
        let alignment = ctxt.device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_size(mem::size_of::<T>() as u64, alignment);
        let capacity = stride * initial_len.max(1) as u64;

        UniformBatch {
            bytes: Vec::with_capacity(capacity as usize),
            buffer: Self::allocate(&ctxt, label, capacity),
            capacity,
            stride,
            len: 0,
            label,
            _marker: PhantomData,
        }
    }

    fn allocate(ctxt: &Context, label: &'static str, size: u64) -> wgpu::Buffer {
        ctxt.create_buffer(
            Some(label),
            size,
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    /// The size of one entry as bound by the shader.
    #[inline]
    pub fn binding_size(&self) -> u64 {
        mem::size_of::<T>() as u64
    }

    /// The number of entries pushed since the last clear.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing was pushed since the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forgets every entry, keeping the allocations.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.len = 0;
    }

    /// Appends an entry and returns its dynamic offset.
    pub fn push(&mut self, value: &T) -> u32 {
        let offset = self.len as u64 * self.stride;
        let bytes = bytemuck::bytes_of(value);
        self.bytes.extend_from_slice(bytes);
        self.bytes
            .resize(self.bytes.len() + self.stride as usize - bytes.len(), 0);
        self.len += 1;
        offset as u32
    }

    /// Uploads the pushed entries.
    ///
    /// Returns `true` if the GPU buffer had to be reallocated, in which case every bind
    /// group referencing [`UniformBatch::buffer`] must be recreated.
    pub fn upload(&mut self) -> bool {
        if self.bytes.is_empty() {
            return false;
        }

        let ctxt = Context::get();
        let required = self.bytes.len() as u64;
        let grown = required > self.capacity;

        if grown {
            while self.capacity < required {
                self.capacity *= 2;
            }
            log::debug!(
                "Growing the {} buffer to {} bytes.",
                self.label,
                self.capacity
            );
            self.buffer = Self::allocate(&ctxt, self.label, self.capacity);
        }

        ctxt.write_buffer(&self.buffer, 0, &self.bytes);
        grown
    }

    /// The GPU buffer.
    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
