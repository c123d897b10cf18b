//! Vue Router: registers a router instance on the app

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::BuildConfig;

pub struct VueRouter;

impl FeatureModule for VueRouter {
    fn name(&self) -> &'static str {
        "vue-router"
    }

    fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
        DependencySet::new().dependency("vue-router", "^4.2.5")
    }

    fn patches(&self, _config: &BuildConfig) -> Vec<PatchDirective> {
        vec![
            PatchDirective::append("src/main.ts", "import router from './router';\n"),
            PatchDirective::replace("src/main.ts", r"\.mount\(", ".use(router).mount("),
        ]
    }

    fn additional_files(&self, _config: &BuildConfig) -> Vec<AdditionalFile> {
        vec![
            AdditionalFile::new(
                "src/router/index.ts",
                r#"import { createRouter, createWebHistory } from 'vue-router';
import Home from '../views/Home.vue';
import About from '../views/About.vue';

const router = createRouter({
  history: createWebHistory(),
  routes: [
    { path: '/', component: Home },
    { path: '/about', component: About },
  ],
});

export default router;
"#,
            ),
            AdditionalFile::new(
                "src/views/Home.vue",
                r#"<template>
  <div>
    <h1>Home Page</h1>
    <p>Welcome to your app!</p>
  </div>
</template>
"#,
            ),
            AdditionalFile::new(
                "src/views/About.vue",
                r#"<template>
  <div>
    <h1>About Page</h1>
    <p>Learn more about us.</p>
  </div>
</template>
"#,
            ),
        ]
    }
}
