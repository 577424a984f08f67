pub mod dialog_surface;
