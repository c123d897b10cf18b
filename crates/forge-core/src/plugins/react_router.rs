//! React Router: wraps the root component in `BrowserRouter`

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::{BuildConfig, Framework};

pub struct ReactRouter;

/// Entry module holding the `<App />` render call
fn entry_file(framework: Framework) -> &'static str {
    match framework {
        Framework::Nextjs => "src/app/layout.tsx",
        Framework::React => "src/main.tsx",
        _ => "src/main.jsx",
    }
}

impl FeatureModule for ReactRouter {
    fn name(&self) -> &'static str {
        "react-router"
    }

    fn dependencies(&self, config: &BuildConfig) -> DependencySet {
        let deps = DependencySet::new().dependency("react-router-dom", "^6.20.0");
        if config.framework == Framework::React {
            deps.dev_dependency("@types/react-router-dom", "^5.3.3")
        } else {
            deps
        }
    }

    fn patches(&self, config: &BuildConfig) -> Vec<PatchDirective> {
        let entry = entry_file(config.framework);
        vec![
            PatchDirective::append(entry, "import { BrowserRouter } from 'react-router-dom';\n"),
            PatchDirective::replace(entry, "<App />", "<BrowserRouter><App /></BrowserRouter>"),
        ]
    }

    fn additional_files(&self, config: &BuildConfig) -> Vec<AdditionalFile> {
        let ext = if config.framework.is_typescript() {
            "tsx"
        } else {
            "jsx"
        };

        vec![
            AdditionalFile::new(
                format!("src/routes/index.{}", ext),
                r#"import { Routes, Route } from 'react-router-dom';
import Home from '../pages/Home';
import About from '../pages/About';

export default function AppRoutes() {
  return (
    <Routes>
      <Route path="/" element={<Home />} />
      <Route path="/about" element={<About />} />
    </Routes>
  );
}
"#,
            ),
            AdditionalFile::new(
                format!("src/pages/Home.{}", ext),
                r#"export default function Home() {
  return (
    <div>
      <h1>Home Page</h1>
      <p>Welcome to your app!</p>
    </div>
  );
}
"#,
            ),
            AdditionalFile::new(
                format!("src/pages/About.{}", ext),
                r#"export default function About() {
  return (
    <div>
      <h1>About Page</h1>
      <p>Learn more about us.</p>
    </div>
  );
}
"#,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_entry_and_types() {
        let config = BuildConfig::new("app", Framework::React);
        let deps = ReactRouter.dependencies(&config);
        assert_eq!(deps.dependencies["react-router-dom"], "^6.20.0");
        assert!(deps.dev_dependencies.contains_key("@types/react-router-dom"));

        let patches = ReactRouter.patches(&config);
        assert!(patches.iter().all(|p| p.file == "src/main.tsx"));

        let files = ReactRouter.additional_files(&config);
        assert!(files.iter().any(|f| f.path == "src/routes/index.tsx"));
    }
}
