pub const CHANNELS_PER_PIXEL: usize = 3;

pub const PIXEL_STRIDE: usize = CHANNELS_PER_PIXEL;
pub const INDEXED_PIXEL_STRIDE: usize = CHANNELS_PER_PIXEL + 1;
