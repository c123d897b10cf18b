//! Pinia: installs the store plugin and a counter store

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::BuildConfig;

pub struct Pinia;

impl FeatureModule for Pinia {
    fn name(&self) -> &'static str {
        "pinia"
    }

    fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
        DependencySet::new().dependency("pinia", "^2.1.7")
    }

    fn patches(&self, _config: &BuildConfig) -> Vec<PatchDirective> {
        vec![
            PatchDirective::append("src/main.ts", "import { createPinia } from 'pinia';\n"),
            PatchDirective::replace("src/main.ts", r"\.mount\(", ".use(createPinia()).mount("),
        ]
    }

    fn additional_files(&self, _config: &BuildConfig) -> Vec<AdditionalFile> {
        vec![AdditionalFile::new(
            "src/stores/counter.ts",
            r#"import { defineStore } from 'pinia';

export const useCounterStore = defineStore('counter', {
  state: () => ({
    count: 0,
  }),
  actions: {
    increment() {
      this.count++;
    },
    decrement() {
      this.count--;
    },
  },
});
"#,
        )]
    }
}
