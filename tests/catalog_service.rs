use music_catalog::{Catalog, CatalogError, RecordKey, Store, Upsert};

fn catalog() -> Catalog {
    Catalog::new(Store::open_in_memory().unwrap())
}

fn key(input: &str) -> RecordKey {
    RecordKey::parse(input).unwrap()
}

#[test]
fn find_or_create_artist_is_idempotent() {
    let catalog = catalog();

    let first = catalog
        .find_or_create_artist("Daft Punk", "Electronic")
        .unwrap();
    assert!(first.was_created());
    let artist = first.into_inner();
    assert_eq!(artist.id, 1);
    assert_eq!(artist.name, "Daft Punk");
    assert_eq!(artist.genre.as_deref(), Some("Electronic"));

    let second = catalog.find_or_create_artist("Daft Punk", "House").unwrap();
    assert!(!second.was_created());
    assert_eq!(second.record().id, artist.id);
    assert_eq!(second.record().genre.as_deref(), Some("Electronic"));
    assert_eq!(catalog.list_artists_ordered().unwrap().len(), 1);
}

#[test]
fn blank_artist_name_is_a_validation_error() {
    let catalog = catalog();
    let err = catalog.find_or_create_artist("   ", "Pop").unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert!(catalog.list_artists_ordered().unwrap().is_empty());
}

#[test]
fn find_or_create_song_example_scenario() {
    let catalog = catalog();
    catalog
        .find_or_create_artist("Daft Punk", "Electronic")
        .unwrap();

    let created = catalog
        .find_or_create_song("One More Time", "Daft Punk", "2000-11-17", "123")
        .unwrap();
    let song = match created {
        Upsert::Created(song) => song,
        Upsert::Existing(_) => panic!("song should be new"),
    };
    assert_eq!(song.id, 1);
    assert_eq!(song.title, "One More Time");
    assert_eq!(song.artist_id, 1);
    assert_eq!(song.bpm, Some(123));
    assert_eq!(song.release_date.as_deref(), Some("2000-11-17"));

    let again = catalog
        .find_or_create_song("One More Time", "Daft Punk", "2000-11-17", "123")
        .unwrap();
    assert_eq!(again, Upsert::Existing(song));
    assert_eq!(catalog.list_songs_ordered().unwrap().len(), 1);
}

#[test]
fn song_for_unknown_artist_is_never_created() {
    let catalog = catalog();
    let err = catalog
        .find_or_create_song("Like a Prayer", "Madonna", "1989-03-03", "111")
        .unwrap_err();

    assert!(matches!(err, CatalogError::ArtistNotFound(ref name) if name == "Madonna"));
    assert!(catalog.list_songs_ordered().unwrap().is_empty());
}

#[test]
fn non_numeric_bpm_is_stored_as_no_value() {
    let catalog = catalog();
    catalog.find_or_create_artist("Daft Punk", "").unwrap();

    let song = catalog
        .find_or_create_song("Digital Love", "Daft Punk", "2001-06-11", "abc")
        .unwrap()
        .into_inner();
    assert_eq!(song.bpm, None);

    let blank = catalog
        .find_or_create_song("Veridis Quo", "Daft Punk", "", "")
        .unwrap()
        .into_inner();
    assert_eq!(blank.bpm, None);
    assert_eq!(blank.release_date, None);
}

#[test]
fn same_title_is_allowed_under_different_artists() {
    let catalog = catalog();
    catalog.find_or_create_artist("Madonna", "Pop").unwrap();
    catalog.find_or_create_artist("Prince", "Funk").unwrap();

    let a = catalog
        .find_or_create_song("Holiday", "Madonna", "1983", "116")
        .unwrap();
    let b = catalog
        .find_or_create_song("Holiday", "Prince", "1990", "")
        .unwrap();
    assert!(a.was_created() && b.was_created());
    assert_ne!(a.record().id, b.record().id);
}

#[test]
fn update_artist_replaces_both_fields() {
    let catalog = catalog();
    catalog.find_or_create_artist("Prince", "Pop").unwrap();

    let updated = catalog
        .update_artist("Prince", "The Artist", "")
        .unwrap();
    assert_eq!(updated.name, "The Artist");
    assert_eq!(updated.genre, None);

    let err = catalog.update_artist("Prince", "Prince", "Funk").unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { kind: "Artist", .. }));
}

#[test]
fn renaming_onto_an_existing_artist_is_duplicate() {
    let catalog = catalog();
    catalog.find_or_create_artist("Madonna", "").unwrap();
    catalog.find_or_create_artist("Cher", "").unwrap();

    let err = catalog.update_artist("Cher", "Madonna", "").unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateKey { .. }));
}

#[test]
fn update_song_keeps_the_owner() {
    let catalog = catalog();
    catalog.find_or_create_artist("Daft Punk", "").unwrap();
    let song = catalog
        .find_or_create_song("Da Funk", "Daft Punk", "", "")
        .unwrap()
        .into_inner();

    let updated = catalog
        .update_song(&RecordKey::ById(song.id), "Da Funk", "1995", "111")
        .unwrap();
    assert_eq!(updated.bpm, Some(111));
    assert_eq!(updated.release_date.as_deref(), Some("1995"));
    assert_eq!(updated.artist_id, song.artist_id);
}

#[test]
fn delete_artist_twice_reports_not_found() {
    let catalog = catalog();
    catalog.find_or_create_artist("Madonna", "Pop").unwrap();

    let removal = catalog.delete_artist(&key("Madonna")).unwrap();
    assert_eq!(removal.artist.name, "Madonna");
    assert_eq!(removal.songs_removed, 0);

    let err = catalog.delete_artist(&key("Madonna")).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[test]
fn delete_artist_by_id_removes_its_songs() {
    let catalog = catalog();
    let artist = catalog
        .find_or_create_artist("Daft Punk", "")
        .unwrap()
        .into_inner();
    catalog.find_or_create_artist("Justice", "").unwrap();
    catalog
        .find_or_create_song("Around the World", "Daft Punk", "1997", "121")
        .unwrap();
    catalog
        .find_or_create_song("Revolution 909", "Daft Punk", "1998", "126")
        .unwrap();
    catalog
        .find_or_create_song("Genesis", "Justice", "2007", "")
        .unwrap();

    let removal = catalog
        .delete_artist(&key(&artist.id.to_string()))
        .unwrap();
    assert_eq!(removal.songs_removed, 2);

    let songs = catalog.list_songs_ordered().unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0].title, "Genesis");
}

#[test]
fn delete_song_by_missing_id_leaves_store_unchanged() {
    let catalog = catalog();
    catalog.find_or_create_artist("Daft Punk", "").unwrap();
    catalog
        .find_or_create_song("Aerodynamic", "Daft Punk", "2001", "123")
        .unwrap();

    let err = catalog.delete_song(&key("99")).unwrap_err();
    assert_eq!(err.to_string(), "Song #99 not found");
    assert_eq!(catalog.list_songs_ordered().unwrap().len(), 1);
}

#[test]
fn delete_song_by_title() {
    let catalog = catalog();
    catalog.find_or_create_artist("Daft Punk", "").unwrap();
    catalog
        .find_or_create_song("Aerodynamic", "Daft Punk", "2001", "123")
        .unwrap();

    let deleted = catalog.delete_song(&key("Aerodynamic")).unwrap();
    assert_eq!(deleted.title, "Aerodynamic");
    assert!(catalog.list_songs_ordered().unwrap().is_empty());
}

#[test]
fn songs_by_bpm_are_non_decreasing_with_blanks_last() {
    let catalog = catalog();
    catalog.find_or_create_artist("Mix", "").unwrap();
    for (title, bpm) in [("A", "128"), ("B", ""), ("C", "90"), ("D", "x"), ("E", "128")] {
        catalog.find_or_create_song(title, "Mix", "", bpm).unwrap();
    }

    let songs = catalog.list_songs_by_bpm().unwrap();
    let bpms: Vec<Option<u32>> = songs.iter().map(|s| s.bpm).collect();
    assert_eq!(bpms, vec![Some(90), Some(128), Some(128), None, None]);
    assert_eq!(
        songs.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
        vec!["C", "A", "E", "B", "D"]
    );
}

#[test]
fn listings_sort_by_name_and_title() {
    let catalog = catalog();
    catalog.find_or_create_artist("Zapp", "").unwrap();
    catalog.find_or_create_artist("Air", "").unwrap();
    catalog.find_or_create_song("Sexy Boy", "Air", "", "").unwrap();
    catalog.find_or_create_song("Kelly", "Air", "", "").unwrap();

    let artists: Vec<String> = catalog
        .list_artists_ordered()
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(artists, vec!["Air", "Zapp"]);

    let titles: Vec<String> = catalog
        .list_songs_ordered()
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Kelly", "Sexy Boy"]);
}

#[test]
fn songs_for_artist_are_in_insertion_order() {
    let catalog = catalog();
    let air = catalog.find_or_create_artist("Air", "").unwrap().into_inner();
    let zapp = catalog.find_or_create_artist("Zapp", "").unwrap().into_inner();
    catalog.find_or_create_song("Sexy Boy", "Air", "", "").unwrap();
    catalog.find_or_create_song("Computer Love", "Zapp", "", "").unwrap();
    catalog.find_or_create_song("Kelly", "Air", "", "").unwrap();

    let titles: Vec<String> = catalog
        .list_songs_for_artist(&air)
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert_eq!(titles, vec!["Sexy Boy", "Kelly"]);
    assert_eq!(catalog.list_songs_for_artist(&zapp).unwrap().len(), 1);
}
