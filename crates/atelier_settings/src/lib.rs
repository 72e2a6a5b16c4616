//! Application settings exposed through reflection.
//!
//! A settings type is an ordinary reflected struct implementing
//! [`Settings`]. The [`SettingsManager`] keeps one instance per type and
//! persists all of them as a single [`DataBlock`](atelier_meta::serialization::DataBlock)
//! tree, one child block per settings class, written as RON.
//!
//! ```
//! use atelier_meta::impl_meta_class;
//! use atelier_settings::{Settings, SettingsManager};
//!
//! #[derive(Default)]
//! struct AudioSettings {
//!     volume: f32,
//! }
//!
//! impl_meta_class!(AudioSettings {
//!     "volume": f32 => |s| s.volume, |s, v| s.volume = v, default 1.0;
//! });
//! impl Settings for AudioSettings {}
//!
//! let mut manager = SettingsManager::new();
//! manager.register_settings::<AudioSettings>().unwrap().volume = 0.5;
//!
//! let text = manager.save_to_string().unwrap();
//!
//! let mut restored = SettingsManager::new();
//! restored.register_settings::<AudioSettings>().unwrap();
//! restored.load_from_str(&text).unwrap();
//! assert_eq!(restored.get_settings::<AudioSettings>().unwrap().volume, 0.5);
//! ```

// -----------------------------------------------------------------------------
// Modules

mod error;
mod manager;
mod settings;

// -----------------------------------------------------------------------------
// Exports

pub use error::SettingsError;
pub use manager::SettingsManager;
pub use settings::Settings;
