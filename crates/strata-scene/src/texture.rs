/// An embedded texture. `height == 0` marks packed image data (png, jpeg,
/// ...) of `width` bytes; otherwise `data` holds raw RGBA texels.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub format_hint: String,
    pub data: Vec<u8>,
}

impl Texture {
    pub fn is_packed(&self) -> bool {
        self.height == 0
    }

    /// The byte length `data` is expected to have given the dimensions.
    pub fn expected_data_len(&self) -> usize {
        if self.is_packed() {
            self.width as usize
        } else {
            self.width as usize * self.height as usize * 4
        }
    }
}
