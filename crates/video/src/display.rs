use {
    crate::*,
    base::*,
    image::{Image, to_u32},
    minifb::{Key, Window, WindowOptions},
};

/// Presents decoded images. Renderers may be tied to the thread that built
/// them, so they are never required to be `Send`.
pub trait Renderer {
    fn render(&mut self, image: &Image) -> Result<(), VideoError>;

    /// False once the user has closed the output.
    fn is_open(&self) -> bool;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, image: &Image) -> Result<(), VideoError> {
        (**self).render(image)
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// Desktop window; ESC or the close button ends it.
pub struct WindowRenderer {
    title: String,
    window: Option<Window>,
    size: Vec2<usize>,
    closed: bool,
}

impl WindowRenderer {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            window: None,
            size: Vec2::zero(),
            closed: false,
        }
    }

    // (re)open the window so it matches the frame size
    fn window_for(&mut self, size: Vec2<usize>) -> Result<&mut Window, VideoError> {
        if self.window.is_none() || self.size != size {
            log_info!("window renderer: opening {} window", size);
            let window = Window::new(&self.title, size.x, size.y, WindowOptions::default())
                .map_err(|e| VideoError::Render(e.to_string()))?;
            self.window = Some(window);
            self.size = size;
        }
        self.window
            .as_mut()
            .ok_or_else(|| VideoError::Render("window missing".to_string()))
    }
}

impl Renderer for WindowRenderer {
    fn render(&mut self, image: &Image) -> Result<(), VideoError> {
        if self.closed {
            return Err(VideoError::Render("window closed".to_string()));
        }
        let buffer = to_u32(image)?;
        let size = image.size;
        let window = self.window_for(size)?;
        window
            .update_with_buffer(&buffer, size.x, size.y)
            .map_err(|e| VideoError::Render(e.to_string()))?;
        if !window.is_open() || window.is_key_down(Key::Escape) {
            self.closed = true;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed
    }
}

/// Discards images. Optionally reports itself closed after a number of
/// frames, which lets headless runs end the way a closed window would.
#[derive(Debug, Default)]
pub struct NullRenderer {
    rendered: u64,
    close_after: Option<u64>,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn closing_after(frames: u64) -> Self {
        Self {
            rendered: 0,
            close_after: Some(frames),
        }
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, image: &Image) -> Result<(), VideoError> {
        image.validate()?;
        self.rendered += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.close_after.is_none_or(|frames| self.rendered < frames)
    }
}
