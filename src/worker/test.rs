#[cfg(test)]
mod tests {
    use crate::client::Outbox;
    use crate::connection::mock::{MockSink, MockStream};
    use crate::dispatcher::Dispatcher;
    use crate::error::ChatError;
    use crate::room::DEFAULT_ROOM;
    use crate::worker::ConnectionWorker;

    fn create_worker(
        lines: MockStream,
        sink: MockSink,
        dispatcher: &crate::dispatcher::DispatcherHandle,
    ) -> ConnectionWorker<MockStream, MockSink> {
        ConnectionWorker::new(lines, sink, dispatcher.clone(), 32, "test-peer")
    }

    #[tokio::test]
    async fn test_empty_name_disconnects() {
        let (handle, task) = Dispatcher::spawn(16);
        let sink = MockSink::default();

        let result = create_worker(MockStream::new(&["   "]), sink.clone(), &handle)
            .run()
            .await;

        assert!(matches!(result, Err(ChatError::NameEmpty)));
        assert_eq!(
            sink.transcript(),
            "Enter your name: Name cannot be empty. Disconnecting.\n"
        );
        assert!(sink.is_closed());

        drop(handle);
        assert_eq!(task.await.unwrap().client_count(), 0);
    }

    #[tokio::test]
    async fn test_eof_before_name() {
        let (handle, _task) = Dispatcher::spawn(16);
        let sink = MockSink::default();

        let result = create_worker(MockStream::new(&[]), sink.clone(), &handle)
            .run()
            .await;

        assert!(matches!(result, Err(ChatError::ConnectionClosed)));
        assert_eq!(sink.transcript(), "Enter your name: ");
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let (handle, task) = Dispatcher::spawn(16);
        let (outbox, mut bob_rx) = Outbox::channel(16);
        handle.register("bob".to_string(), outbox).await.unwrap();
        assert_eq!(bob_rx.recv().await.unwrap(), "bob has joined the chat.");

        let sink = MockSink::default();
        let result = create_worker(MockStream::new(&["bob", "hi"]), sink.clone(), &handle)
            .run()
            .await;

        assert!(matches!(result, Err(ChatError::NameTaken(name)) if name == "bob"));
        assert_eq!(
            sink.transcript(),
            "Enter your name: Name 'bob' is already taken. Please choose another. Disconnecting.\n"
        );
        assert!(sink.is_closed());
        assert!(bob_rx.try_recv().is_err());

        drop(handle);
        let registry = task.await.unwrap();
        assert_eq!(registry.client_count(), 1);
    }

    #[tokio::test]
    async fn test_session_until_end_of_stream() {
        let (handle, task) = Dispatcher::spawn(16);
        let sink = MockSink::default();

        let result = create_worker(
            MockStream::new(&["  alice  ", "hello  ", "/join rust", "/whisper alice hi"]),
            sink.clone(),
            &handle,
        )
        .run()
        .await;

        assert!(result.is_ok());
        assert_eq!(
            sink.lines(),
            vec![
                "Enter your name: alice has joined the chat.",
                "alice: hello",
                "You have joined room 'rust'.",
                "alice has joined the room.",
                "You cannot whisper to yourself.",
            ]
        );
        assert!(sink.is_closed());

        drop(handle);
        let registry = task.await.unwrap();
        assert_eq!(registry.client_count(), 0);
        assert_eq!(registry.room_count(), 0);
    }

    #[tokio::test]
    async fn test_read_error_unregisters() {
        let (handle, task) = Dispatcher::spawn(16);
        let (outbox, mut watcher_rx) = Outbox::channel(16);
        handle.register("watcher".to_string(), outbox).await.unwrap();

        let sink = MockSink::default();
        let result = create_worker(
            MockStream::failing_after(&["carol", "bye"]),
            sink.clone(),
            &handle,
        )
        .run()
        .await;

        assert!(result.is_ok());
        assert!(sink.is_closed());

        let mut seen = Vec::new();
        while let Ok(line) = watcher_rx.try_recv() {
            seen.push(line);
        }
        assert_eq!(
            seen,
            vec![
                "watcher has joined the chat.",
                "carol has joined the chat.",
                "carol: bye",
                "carol has left the chat.",
            ]
        );

        drop(handle);
        let registry = task.await.unwrap();
        assert!(!registry.contains_name("carol"));
        assert_eq!(registry.room(DEFAULT_ROOM).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_prompt_write_failure() {
        let (handle, task) = Dispatcher::spawn(16);
        let sink = MockSink::failing();

        let result = create_worker(MockStream::new(&["dave", "one", "two"]), sink, &handle)
            .run()
            .await;

        // The prompt write fails, so the handshake never starts.
        assert!(matches!(result, Err(ChatError::Io(_))));
        drop(handle);
        assert_eq!(task.await.unwrap().client_count(), 0);
    }
}
