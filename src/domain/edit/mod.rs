// Copyright 2025 kube-dup Authors.
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

//! Interactive edit-validate-retry loop

pub mod codec;
pub mod commit;
pub mod header;
pub mod managed_fields;
pub mod session;
pub mod strip;

pub use self::codec::DocumentCodec;
pub use self::commit::{CommitRecord, CommitResults, CommitStatus, CommitSummary, Committer, ObjectRef};
pub use self::header::{EditHeader, EditReason};
pub use self::managed_fields::ManagedFieldsSnapshot;
pub use self::session::{CancelReason, EditOutcome, EditPhase, EditRetryLoop, EditSession};
