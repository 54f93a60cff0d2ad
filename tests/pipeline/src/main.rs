fn main() {
    println!("Run `cargo test -p pipeline-tests` to execute end-to-end pipeline tests.");
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use futures_util::stream;
    use sha2::{Digest, Sha256};
    use tempfile::TempDir;

    use streamstore_coordinator::{FilePart, MetadataError, MetadataStore, UploadCoordinator};
    use streamstore_fs_sink::FsSink;
    use streamstore_ingest::{FlushStrategy, SourceError, UploadProcessor, UploadResult};

    fn digest_of(bytes: &[u8]) -> String {
        STANDARD.encode(Sha256::digest(bytes))
    }

    fn chunked(payload: &[u8], chunk_size: usize) -> Vec<Result<Vec<u8>, SourceError>> {
        payload.chunks(chunk_size).map(|c| Ok(c.to_vec())).collect()
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<UploadResult>>,
    }

    impl MetadataStore for RecordingStore {
        fn save(
            &self,
            result: &UploadResult,
        ) -> Pin<Box<dyn Future<Output = Result<(), MetadataError>> + Send + '_>> {
            let result = result.clone();
            Box::pin(async move {
                self.saved.lock().unwrap().push(result);
                Ok(())
            })
        }
    }

    async fn ingest_to_disk(
        strategy: FlushStrategy,
        file_name: &str,
        payload: &[u8],
        chunk_size: usize,
    ) -> (TempDir, UploadResult) {
        let dir = TempDir::new().unwrap();
        let processor = UploadProcessor::new(Arc::new(FsSink::new(dir.path())), strategy);
        let result = processor
            .process(file_name, stream::iter(chunked(payload, chunk_size)))
            .await
            .unwrap();
        (dir, result)
    }

    #[tokio::test]
    async fn batch_strategy_end_to_end() {
        let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let (dir, result) =
            ingest_to_disk(FlushStrategy::default(), "blob.bin", &payload, 3000).await;

        assert_eq!(result.size_bytes, payload.len() as u64);
        assert_eq!(result.digest_base64, digest_of(&payload));

        let on_disk = std::fs::read(dir.path().join("blob.bin")).unwrap();
        assert_eq!(on_disk, payload);
    }

    #[tokio::test]
    async fn relay_strategy_end_to_end() {
        let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 241) as u8).collect();
        let (dir, result) = ingest_to_disk(
            FlushStrategy::Relay { capacity: 4 },
            "blob.bin",
            &payload,
            1777,
        )
        .await;

        assert_eq!(result.size_bytes, payload.len() as u64);
        assert_eq!(result.digest_base64, digest_of(&payload));

        let on_disk = std::fs::read(dir.path().join("blob.bin")).unwrap();
        assert_eq!(on_disk, payload);
    }

    #[tokio::test]
    async fn strategies_produce_identical_files_and_digests() {
        let payload = b"The quick brown fox jumps over the lazy dog".repeat(500);

        let (dir_a, batched) =
            ingest_to_disk(FlushStrategy::Batch { threshold: 512 }, "f", &payload, 100).await;
        let (dir_b, relayed) =
            ingest_to_disk(FlushStrategy::Relay { capacity: 2 }, "f", &payload, 100).await;

        assert_eq!(batched.digest_base64, relayed.digest_base64);
        assert_eq!(batched.size_bytes, relayed.size_bytes);
        assert_eq!(
            std::fs::read(dir_a.path().join("f")).unwrap(),
            std::fs::read(dir_b.path().join("f")).unwrap(),
        );
    }

    #[tokio::test]
    async fn empty_file_policies_differ_per_strategy() {
        let dir = TempDir::new().unwrap();
        let processor = UploadProcessor::new(
            Arc::new(FsSink::new(dir.path())),
            FlushStrategy::default(),
        );
        let result = processor
            .process("never-opened.txt", stream::iter(chunked(b"", 1)))
            .await
            .unwrap();
        assert_eq!(result.size_bytes, 0);
        // Batch strategy skips the sink entirely for empty input.
        assert!(!dir.path().join("never-opened.txt").exists());

        let processor = UploadProcessor::new(
            Arc::new(FsSink::new(dir.path())),
            FlushStrategy::relay(),
        );
        let result = processor
            .process("opened-empty.txt", stream::iter(chunked(b"", 1)))
            .await
            .unwrap();
        assert_eq!(result.size_bytes, 0);
        // Relay strategy opens eagerly, so the empty file exists on disk.
        let on_disk = std::fs::read(dir.path().join("opened-empty.txt")).unwrap();
        assert!(on_disk.is_empty());
    }

    #[tokio::test]
    async fn coordinator_against_real_filesystem() {
        let dir = TempDir::new().unwrap();
        let processor = UploadProcessor::new(
            Arc::new(FsSink::new(dir.path())),
            FlushStrategy::Batch { threshold: 8 },
        );
        let coord = UploadCoordinator::new(processor);
        let store = RecordingStore::default();

        let parts = vec![
            FilePart::new("docs/a.txt", stream::iter(chunked(b"alpha content", 4))),
            FilePart::new("docs/b.txt", stream::iter(chunked(b"beta", 4))),
        ];
        let results = coord.process_request(parts, &store).await;

        assert_eq!(results.len(), 2);
        assert_eq!(
            std::fs::read(dir.path().join("docs/a.txt")).unwrap(),
            b"alpha content"
        );
        assert_eq!(std::fs::read(dir.path().join("docs/b.txt")).unwrap(), b"beta");

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].digest_base64, digest_of(b"alpha content"));
        assert_eq!(saved[1].digest_base64, digest_of(b"beta"));
    }

    #[tokio::test]
    async fn unwritable_destination_fails_without_result() {
        let dir = TempDir::new().unwrap();
        let processor = UploadProcessor::new(
            Arc::new(FsSink::new(dir.path())),
            FlushStrategy::Batch { threshold: 2 },
        );
        // Invalid name is rejected at open, which happens on the first flush.
        let err = processor
            .process("../escape.bin", stream::iter(chunked(b"data", 2)))
            .await
            .unwrap_err();
        assert!(matches!(err, streamstore_ingest::UploadError::Sink(_)));
    }
}
