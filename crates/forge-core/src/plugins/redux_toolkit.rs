//! Redux Toolkit: store, counter slice, and a `Provider` around the app

use super::{AdditionalFile, DependencySet, FeatureModule, PatchDirective};
use crate::config::{BuildConfig, Framework};

pub struct ReduxToolkit;

impl FeatureModule for ReduxToolkit {
    fn name(&self) -> &'static str {
        "redux-toolkit"
    }

    fn dependencies(&self, _config: &BuildConfig) -> DependencySet {
        DependencySet::new()
            .dependency("@reduxjs/toolkit", "^2.0.0")
            .dependency("react-redux", "^9.0.0")
            .dev_dependency("@types/react-redux", "^7.1.33")
    }

    fn patches(&self, config: &BuildConfig) -> Vec<PatchDirective> {
        let entry = match config.framework {
            Framework::Nextjs => "src/app/layout.tsx",
            _ => "src/main.tsx",
        };

        vec![
            PatchDirective::append(
                entry,
                "import { Provider } from 'react-redux';\nimport { store } from './store';\n",
            ),
            PatchDirective::replace(
                entry,
                "<App />",
                "<Provider store={store}><App /></Provider>",
            ),
        ]
    }

    fn additional_files(&self, config: &BuildConfig) -> Vec<AdditionalFile> {
        let ext = if config.framework.is_typescript() {
            "ts"
        } else {
            "js"
        };

        vec![
            AdditionalFile::new(
                format!("src/store/index.{}", ext),
                r#"import { configureStore } from '@reduxjs/toolkit';
import counterReducer from './counterSlice';

export const store = configureStore({
  reducer: {
    counter: counterReducer,
  },
});

export type RootState = ReturnType<typeof store.getState>;
export type AppDispatch = typeof store.dispatch;
"#,
            ),
            AdditionalFile::new(
                format!("src/store/counterSlice.{}", ext),
                r#"import { createSlice, PayloadAction } from '@reduxjs/toolkit';

interface CounterState {
  value: number;
}

const initialState: CounterState = {
  value: 0,
};

export const counterSlice = createSlice({
  name: 'counter',
  initialState,
  reducers: {
    increment: (state) => {
      state.value += 1;
    },
    decrement: (state) => {
      state.value -= 1;
    },
    incrementByAmount: (state, action: PayloadAction<number>) => {
      state.value += action.payload;
    },
  },
});

export const { increment, decrement, incrementByAmount } = counterSlice.actions;
export default counterSlice.reducer;
"#,
            ),
        ]
    }
}
