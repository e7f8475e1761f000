// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The application-facing facade and the backend SPI.

mod logger;
mod logging;
mod manager;
mod registry;

pub use self::logger::Logger;
pub use self::logging::Logging;
pub use self::logging::default_logging;
pub use self::logging::logger;
pub use self::logging::set_default_logging;
pub use self::logging::shutdown;
pub use self::manager::DelegateLogger;
pub use self::manager::LoggerManager;
pub use self::manager::child_name;
pub use self::registry::PluginRegistry;
