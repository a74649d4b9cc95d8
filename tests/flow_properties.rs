use plant_gallery::{
    ChatTurn, GalleryError, GalleryStore, ImageData, PendingUpload, Phase, SavedEntry,
};
use proptest::prelude::*;

fn image(bytes: Vec<u8>) -> ImageData {
    ImageData::new(bytes, "image/jpeg")
}

fn save(pending: &mut PendingUpload, store: &mut GalleryStore, bytes: Vec<u8>, name: &str) {
    pending.stage_image(image(bytes)).unwrap();
    pending.request_save().unwrap();
    pending.set_draft_name(name).unwrap();
    pending.confirm_save(store).unwrap();
}

fn snapshot(store: &GalleryStore) -> Vec<(String, Vec<u8>)> {
    store
        .entries()
        .map(|entry: &SavedEntry| (entry.name.clone(), entry.image.bytes.clone()))
        .collect()
}

#[test]
fn fern_end_to_end_without_identification() {
    let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
    let mut store = GalleryStore::new();
    let mut pending = PendingUpload::new();

    save(&mut pending, &mut store, jpeg.clone(), "Fern");

    let entry = store.get("Fern").unwrap();
    assert_eq!(entry.name, "Fern");
    assert_eq!(entry.image.bytes, jpeg);
    assert_eq!(entry.image.media_type, "image/jpeg");
    assert_eq!(entry.identification, None);
    assert_eq!(entry.care_info, None);
    assert!(entry.chat_log.is_empty());
}

#[test]
fn chat_log_is_saved_in_order() {
    let mut store = GalleryStore::new();
    let mut pending = PendingUpload::new();

    pending.stage_image(image(vec![1, 2, 3])).unwrap();
    pending.append_chat_turn(ChatTurn::new("You", "hi")).unwrap();
    pending.append_chat_turn(ChatTurn::new("Plant", "hello")).unwrap();
    pending.request_save().unwrap();
    pending.set_draft_name("Basil").unwrap();
    pending.confirm_save(&mut store).unwrap();

    let expected: Vec<ChatTurn> = vec![("You", "hi").into(), ("Plant", "hello").into()];
    assert_eq!(store.get("Basil").unwrap().chat_log, expected);
}

#[test]
fn list_after_a_b_a_keeps_first_position() {
    let mut store = GalleryStore::new();
    let mut pending = PendingUpload::new();

    save(&mut pending, &mut store, vec![1], "a");
    save(&mut pending, &mut store, vec![2], "b");
    save(&mut pending, &mut store, vec![3], "a");

    assert_eq!(store.list().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(store.get("a").unwrap().image.bytes, vec![3]);
}

#[test]
fn saved_entries_are_not_visible_before_confirm() {
    let mut store = GalleryStore::new();
    let mut pending = PendingUpload::new();

    pending.stage_image(image(vec![9])).unwrap();
    pending.append_chat_turn(ChatTurn::new("You", "hi")).unwrap();
    pending.request_save().unwrap();
    pending.set_draft_name("Draft").unwrap();

    assert!(store.is_empty());
    assert!(matches!(store.get("Draft"), Err(GalleryError::NotFound(_))));
}

proptest! {
    #[test]
    fn prop_stage_then_discard_leaves_store_unchanged(
        existing in prop::collection::vec(
            ("[a-z]{1,6}", prop::collection::vec(any::<u8>(), 1..16)),
            0..5,
        ),
        staged in prop::collection::vec(any::<u8>(), 1..64),
        confirm_first in any::<bool>(),
        name in "[a-z]{0,6}",
    ) {
        let mut store = GalleryStore::new();
        let mut pending = PendingUpload::new();
        for (n, bytes) in existing {
            save(&mut pending, &mut store, bytes, &n);
        }
        let before = snapshot(&store);

        pending.stage_image(image(staged)).unwrap();
        if confirm_first {
            pending.request_save().unwrap();
            pending.set_draft_name(&name).unwrap();
        }
        pending.discard();

        prop_assert_eq!(pending.phase(), Phase::Empty);
        prop_assert!(pending.staged_image().is_none());
        prop_assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn prop_confirmed_save_round_trips_bytes(
        bytes in prop::collection::vec(any::<u8>(), 1..256),
        name in "[A-Za-z][A-Za-z0-9 ]{0,11}",
    ) {
        let mut store = GalleryStore::new();
        let mut pending = PendingUpload::new();
        save(&mut pending, &mut store, bytes.clone(), &name);

        let entry = store.get(name.trim()).unwrap();
        prop_assert_eq!(&entry.image.bytes, &bytes);
        prop_assert_eq!(pending.phase(), Phase::Empty);
    }

    #[test]
    fn prop_second_save_overwrites(
        first in prop::collection::vec(any::<u8>(), 1..32),
        second in prop::collection::vec(any::<u8>(), 1..32),
        name in "[a-z]{1,8}",
    ) {
        let mut store = GalleryStore::new();
        let mut pending = PendingUpload::new();
        save(&mut pending, &mut store, first, &name);
        save(&mut pending, &mut store, second.clone(), &name);

        prop_assert_eq!(store.len(), 1);
        prop_assert_eq!(&store.get(&name).unwrap().image.bytes, &second);
    }

    #[test]
    fn prop_blank_name_is_rejected_and_stays_confirming(name in "[ \t]{0,4}") {
        let mut store = GalleryStore::new();
        let mut pending = PendingUpload::new();
        pending.stage_image(image(vec![1, 2])).unwrap();
        pending.request_save().unwrap();
        pending.set_draft_name(&name).unwrap();

        let is_validation = matches!(
            pending.confirm_save(&mut store),
            Err(GalleryError::Validation(_))
        );
        prop_assert!(is_validation);
        prop_assert_eq!(pending.phase(), Phase::Confirming);
        prop_assert!(store.is_empty());
    }

    #[test]
    fn prop_listing_follows_first_insertion(names in prop::collection::vec("[a-c]", 1..12)) {
        let mut store = GalleryStore::new();
        let mut pending = PendingUpload::new();
        let mut expected: Vec<String> = Vec::new();
        for (i, n) in names.iter().enumerate() {
            save(&mut pending, &mut store, vec![i as u8], n);
            if !expected.contains(n) {
                expected.push(n.clone());
            }
        }

        let listed: Vec<String> = store.list().map(str::to_string).collect();
        prop_assert_eq!(listed, expected);
    }
}
