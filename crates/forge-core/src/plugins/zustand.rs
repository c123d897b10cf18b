//! Zustand: a single store hook, no source patches

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::BuildConfig;

pub struct Zustand;

impl FeatureModule for Zustand {
    fn name(&self) -> &'static str {
        "zustand"
    }

    fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
        DependencySet::new().dependency("zustand", "^4.4.7")
    }

    fn patches(&self, _config: &BuildConfig) -> Vec<PatchDirective> {
        Vec::new()
    }

    fn additional_files(&self, config: &BuildConfig) -> Vec<AdditionalFile> {
        let ext = if config.framework.is_typescript() {
            "ts"
        } else {
            "js"
        };

        vec![AdditionalFile::new(
            format!("src/store/useStore.{}", ext),
            r#"import { create } from 'zustand';

interface StoreState {
  count: number;
  increment: () => void;
  decrement: () => void;
}

export const useStore = create<StoreState>((set) => ({
  count: 0,
  increment: () => set((state) => ({ count: state.count + 1 })),
  decrement: () => set((state) => ({ count: state.count - 1 })),
}));
"#,
        )]
    }
}
