//! `disk_img`: create the FAT32 disk image unless one is already there.

use axmake_config::ResolvedConfig;

use crate::dispatch::Action;
use crate::exec::{Invocation, UTILS_MK};

pub fn plan(cfg: &ResolvedConfig) -> Action {
    let image = &cfg.qemu.disk_img;
    if cfg.in_root(image).exists() {
        return Action::Skip {
            warning: format!("disk image \"{}\" already exists!", image.display()),
        };
    }
    Action::Run(
        Invocation::make(UTILS_MK)
            .arg("disk_image")
            .arg("FAT_FORMAT=fat32")
            .var("DISK_IMG", image),
    )
}
