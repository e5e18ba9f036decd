use crate::state::StoreState;
use crate::{Approval, CaseStore, CaseWithRevisions, StoreError};
use camino::{Utf8Path, Utf8PathBuf};
use fs2::FileExt;
use releasegate_types::{
    ApprovalPacket, CaseStatus, DraftContext, DraftSubmission, Evaluation, HumanSignoff,
    PacketRecord, ReleaseCase, Revision,
};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use time::OffsetDateTime;
use tracing::debug;

const STATE_FILE: &str = "store.json";
const LOCK_FILE: &str = "store.lock";

/// JSON-file store rooted at a directory.
///
/// Every call takes an exclusive lock on `store.lock`, reads `store.json`,
/// applies one operation and atomically replaces the file, so concurrent
/// processes see each operation as a single step.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: Utf8PathBuf,
}

impl FileStore {
    /// Open an existing store directory.
    ///
    /// A missing directory is a setup problem, not an empty store.
    pub fn open(dir: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(StoreError::Unavailable(format!(
                "store directory {dir} does not exist (submit a draft first or pass --store-dir)"
            )));
        }
        Ok(Self { dir })
    }

    /// Open the store, creating its directory if needed.
    pub fn open_or_create(dir: impl AsRef<Utf8Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create store directory {dir}: {e}"))
        })?;
        Self::open(dir)
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    fn state_path(&self) -> Utf8PathBuf {
        self.dir.join(STATE_FILE)
    }

    fn acquire(&self) -> Result<File, StoreError> {
        let path = self.dir.join(LOCK_FILE);
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| StoreError::Unavailable(format!("cannot open lock file {path}: {e}")))?;
        lock.lock_exclusive()?;
        Ok(lock)
    }

    fn load(&self) -> Result<StoreState, StoreError> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(StoreState::default());
        }
        let text = fs::read_to_string(&path)?;
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt(format!("{path}: {e}")))
    }

    fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        let path = self.state_path();
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, state)
            .map_err(|e| StoreError::Corrupt(format!("serialize store state: {e}")))?;
        tmp.write_all(b"\n")?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %path, "store state written");
        Ok(())
    }

    fn read<R>(&self, op: impl FnOnce(&StoreState) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let lock = self.acquire()?;
        let result = self.load().and_then(|state| op(&state));
        FileExt::unlock(&lock)?;
        result
    }

    fn update<R>(
        &self,
        op: impl FnOnce(&mut StoreState) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let lock = self.acquire()?;
        let result = self.load().and_then(|mut state| {
            let out = op(&mut state)?;
            self.save(&state)?;
            Ok(out)
        });
        FileExt::unlock(&lock)?;
        result
    }
}

impl CaseStore for FileStore {
    fn create_case(&self, context: DraftContext) -> Result<ReleaseCase, StoreError> {
        self.update(|s| Ok(s.create_case(context, OffsetDateTime::now_utc())))
    }

    fn append_revision(
        &self,
        case_id: &str,
        expected: CaseStatus,
        submission: DraftSubmission,
        evaluation: Evaluation,
    ) -> Result<Revision, StoreError> {
        self.update(|s| {
            s.append_revision(
                case_id,
                expected,
                submission,
                evaluation,
                OffsetDateTime::now_utc(),
            )
        })
    }

    fn get_with_revisions(&self, case_id: &str) -> Result<CaseWithRevisions, StoreError> {
        self.read(|s| s.get_with_revisions(case_id))
    }

    fn list_cases(&self, limit: usize) -> Result<Vec<ReleaseCase>, StoreError> {
        self.read(|s| Ok(s.list_cases(limit)))
    }

    fn get_packet(
        &self,
        case_id: &str,
        revision_id: &str,
    ) -> Result<Option<PacketRecord>, StoreError> {
        self.read(|s| Ok(s.get_packet(case_id, revision_id)))
    }

    fn create_packet(&self, packet: ApprovalPacket) -> Result<PacketRecord, StoreError> {
        if let Some(existing) = self.get_packet(&packet.case_id, &packet.revision_id)? {
            return Ok(existing);
        }
        self.update(|s| s.create_packet(packet).map(|(record, _)| record))
    }

    fn approve(
        &self,
        case_id: &str,
        revision_id: &str,
        expected: CaseStatus,
        signoff: Option<HumanSignoff>,
    ) -> Result<Approval, StoreError> {
        self.update(|s| {
            s.approve(case_id, revision_id, expected, signoff, OffsetDateTime::now_utc())
        })
    }

    fn transition_status(
        &self,
        case_id: &str,
        expected: CaseStatus,
        next: CaseStatus,
    ) -> Result<ReleaseCase, StoreError> {
        self.update(|s| s.transition_status(case_id, expected, next, OffsetDateTime::now_utc()))
    }
}
