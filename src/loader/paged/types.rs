//! Core types for rendered pages

/// Raw rendered page image (3 bytes per pixel: R, G, B)
#[derive(Clone)]
pub struct ImageData {
    pub pixels: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// Complete rendered page data
#[derive(Clone)]
pub struct PageData {
    /// Rendered image data
    pub img_data: ImageData,
    /// Page number (0-indexed)
    pub page_num: usize,
    /// Scale factor used for rendering
    pub scale_factor: f32,
    /// Page height in rendered pixels
    pub page_height_px: f32,
}

impl std::fmt::Debug for PageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageData")
            .field("page_num", &self.page_num)
            .field("img_data.width_px", &self.img_data.width_px)
            .field("img_data.height_px", &self.img_data.height_px)
            .field("scale_factor", &self.scale_factor)
            .finish_non_exhaustive()
    }
}
