use core::ptr;
use std::fs;
use std::path::{Path, PathBuf};

use atelier_event::MultiDelegate;
use atelier_meta::class::{ConstMetaInstance, MetaInstance};
use atelier_meta::identity::ClassUid;
use atelier_meta::serialization::DataBlock;
use atelier_utils::hash::{PassHashMap, PassHashState};

use crate::SettingsError;
use crate::settings::{ErasedSettings, Settings};

/// Name of the root block of a settings file.
const ROOT_BLOCK: &str = "settings";

// -----------------------------------------------------------------------------
// SettingsManager

/// Owns one instance of each registered settings type and persists them.
///
/// Blocks read for a settings class that is not registered yet are kept
/// aside, written back on save, and applied when the class registers.
pub struct SettingsManager {
    settings: Vec<Box<dyn ErasedSettings>>,
    index: PassHashMap<ClassUid, usize>,
    unregistered: Vec<DataBlock>,
    path: Option<PathBuf>,
    loaded: MultiDelegate<str>,
}

impl SettingsManager {
    pub fn new() -> Self {
        Self {
            settings: Vec::new(),
            index: PassHashMap::with_hasher(PassHashState),
            unregistered: Vec::new(),
            path: None,
            loaded: MultiDelegate::new(),
        }
    }

    /// A manager bound to a settings file, see [`save`](Self::save) and
    /// [`load`](Self::load).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let mut manager = Self::new();
        manager.path = Some(path.into());
        manager
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
    }

    /// Invoked with the class name each time a settings block is applied.
    pub fn event_settings_loaded(&self) -> &MultiDelegate<str> {
        &self.loaded
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Creates the default instance of `T`, or returns the existing one.
    ///
    /// A block for `T` read before registration is applied now. Fails if
    /// another settings type is stored under the UID of `T`.
    pub fn register_settings<T: Settings>(&mut self) -> Result<&mut T, SettingsError> {
        let class = T::meta_class();
        let index = match self.index.get(&class.uid()) {
            Some(&index) => {
                let existing = self.settings[index].object_meta_class();
                if !ptr::eq(existing, class) {
                    let err = SettingsError::UidCollision {
                        uid: class.uid(),
                        existing: existing.type_name(),
                        incoming: class.type_name(),
                    };
                    log::error!("{err}");
                    return Err(err);
                }
                log::warn!("Settings `{}` registered twice.", class.name());
                index
            }
            None => {
                let mut settings = T::default();
                if let Some(pos) = self.unregistered.iter().position(|b| b.name() == class.name()) {
                    let block = self.unregistered.remove(pos);
                    if !settings.load_from_data_block(&block) {
                        log::warn!("Settings `{}` partially loaded.", class.name());
                    }
                    log::debug!("Applied pending block to settings `{}`.", class.name());
                }
                let index = self.settings.len();
                self.settings.push(Box::new(settings));
                self.index.insert(class.uid(), index);
                log::debug!("Registered settings `{}`.", class.name());
                index
            }
        };

        let existing = self.settings[index].object_meta_class();
        MetaInstance::new(&mut *self.settings[index])
            .into_dynamic_cast::<T>()
            .ok_or(SettingsError::UidCollision {
                uid: class.uid(),
                existing: existing.type_name(),
                incoming: class.type_name(),
            })
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        self.index.contains_key(&T::meta_class().uid())
    }

    pub fn get_settings<T: Settings>(&self) -> Option<&T> {
        let index = *self.index.get(&T::meta_class().uid())?;
        ConstMetaInstance::new(&*self.settings[index]).dynamic_cast()
    }

    pub fn get_settings_mut<T: Settings>(&mut self) -> Option<&mut T> {
        let index = *self.index.get(&T::meta_class().uid())?;
        MetaInstance::new(&mut *self.settings[index]).into_dynamic_cast()
    }

    /// Looks up settings by class name.
    pub fn get_settings_by_name(&self, name: &str) -> Option<ConstMetaInstance<'_>> {
        let index = self.position_by_name(name)?;
        Some(ConstMetaInstance::new(&*self.settings[index]))
    }

    pub fn get_settings_by_name_mut(&mut self, name: &str) -> Option<MetaInstance<'_>> {
        let index = self.position_by_name(name)?;
        Some(MetaInstance::new(&mut *self.settings[index]))
    }

    /// Every registered settings object, in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = ConstMetaInstance<'_>> + '_ {
        self.settings.iter().map(|s| ConstMetaInstance::new(&**s))
    }

    /// Names of blocks waiting for their settings class.
    pub fn unregistered_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.unregistered.iter().map(DataBlock::name)
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.settings
            .iter()
            .position(|s| s.object_meta_class().name() == name)
    }

    // -------------------------------------------------------------------------
    // Data blocks

    /// Writes all settings, registered ones first, then the pending blocks.
    pub fn to_data_block(&self) -> DataBlock {
        let mut root = DataBlock::new(ROOT_BLOCK);
        for settings in &self.settings {
            let name = settings.object_meta_class().name();
            let block = root.add_new_data_block(name);
            if !settings.save_block(block) {
                log::warn!("Settings `{name}` partially saved.");
            }
        }
        for block in &self.unregistered {
            root.add_data_block(block.clone());
        }
        root
    }

    /// Applies each child block of `root` to the settings class of the
    /// same name.
    ///
    /// Unknown blocks are kept for later registration. Returns `false` if
    /// any settings object failed to load completely; the rest are still
    /// applied.
    pub fn load_from_data_block(&mut self, root: &DataBlock) -> bool {
        let mut ok = true;
        for block in root.data_blocks() {
            match self.position_by_name(block.name()) {
                Some(index) => {
                    if !self.settings[index].load_block(block) {
                        log::warn!("Settings `{}` partially loaded.", block.name());
                        ok = false;
                    }
                    self.loaded.invoke(block.name());
                }
                None => {
                    log::warn!("Settings `{}` are not registered, kept for later.", block.name());
                    match self.unregistered.iter_mut().find(|b| b.name() == block.name()) {
                        Some(pending) => pending.copy_from(block),
                        None => self.unregistered.push(block.clone()),
                    }
                }
            }
        }
        ok
    }

    // -------------------------------------------------------------------------
    // Text

    pub fn save_to_string(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default();
        Ok(ron::ser::to_string_pretty(&self.to_data_block(), config)?)
    }

    /// Parses a settings file and applies it, returning whether every
    /// settings object loaded completely.
    pub fn load_from_str(&mut self, text: &str) -> Result<bool, SettingsError> {
        let root: DataBlock = ron::from_str(text)?;
        Ok(self.load_from_data_block(&root))
    }

    // -------------------------------------------------------------------------
    // Files

    /// Writes the settings file, creating its directory.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = self.path.as_deref().ok_or(SettingsError::EmptyPath)?;
        self.save_to(path)
    }

    /// Reads the settings file. See [`load_from_str`](Self::load_from_str).
    pub fn load(&mut self) -> Result<bool, SettingsError> {
        let path = self.path.clone().ok_or(SettingsError::EmptyPath)?;
        self.load_from(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if path.as_os_str().is_empty() {
            return Err(SettingsError::EmptyPath);
        }
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.save_to_string()?)?;
        log::debug!("Settings saved to `{}`.", path.display());
        Ok(())
    }

    pub fn load_from(&mut self, path: &Path) -> Result<bool, SettingsError> {
        if path.as_os_str().is_empty() {
            return Err(SettingsError::EmptyPath);
        }
        log::debug!("Loading settings from `{}`.", path.display());
        let text = fs::read_to_string(path)?;
        self.load_from_str(&text)
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SettingsManager")
            .field(
                "settings",
                &self.iter().map(|s| s.meta_class().name()).collect::<Vec<_>>(),
            )
            .field("unregistered", &self.unregistered_names().collect::<Vec<_>>())
            .field("path", &self.path)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests
