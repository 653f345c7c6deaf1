use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use super::*;
use crate::history::MemoryHistory;

fn small_config() -> EditorConfig {
    EditorConfig {
        grid_width: 16,
        grid_height: 4,
        ..EditorConfig::default()
    }
}

fn editor() -> Editor<MemoryHistory> {
    Editor::open(MemoryHistory::new(), &small_config()).unwrap()
}

fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgba([v, v, v, 255])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn stored_current(editor: &Editor<MemoryHistory>) -> Grid {
    editor.repo().load_current().unwrap().unwrap()
}

// ==================== Open / New ====================

#[test]
fn test_open_starts_blank_untitled_grid() {
    let editor = editor();
    let grid = editor.grid();
    assert_eq!(grid.name(), "Untitled 1");
    assert_eq!((grid.width(), grid.height()), (16, 4));
    assert_eq!(grid.ink_count(), 0);
    assert_eq!(&stored_current(&editor), grid);
}

#[test]
fn test_open_restores_working_grid() {
    let repo = MemoryHistory::new();
    let saved = Grid::new("restored", 8, 8).unwrap().inverted();
    repo.store_current(&saved).unwrap();

    let editor = Editor::open(repo, &small_config()).unwrap();
    assert_eq!(editor.grid(), &saved);
}

#[test]
fn test_open_rejects_bad_threshold_config() {
    let config = EditorConfig {
        dither_threshold: 201,
        ..small_config()
    };
    let err = Editor::open(MemoryHistory::new(), &config).err().unwrap();
    assert!(matches!(err, EditorError::ThresholdOutOfRange(201)));
}

#[test]
fn test_open_rejects_bad_image_max_dimension() {
    for max in [0, 129] {
        let config = EditorConfig {
            image_max_dimension: max,
            ..small_config()
        };
        let err = Editor::open(MemoryHistory::new(), &config).err().unwrap();
        assert!(matches!(
            err,
            EditorError::DimensionOutOfRange { width, height } if width == max && height == max
        ));
    }
}

#[test]
fn test_load_image_with_smallest_max_dimension() {
    let config = EditorConfig {
        image_max_dimension: 1,
        ..small_config()
    };
    let mut editor = Editor::open(MemoryHistory::new(), &config).unwrap();
    let preview = editor.load_image(&gradient_png(4, 4)).unwrap();
    assert_eq!((preview.width(), preview.height()), (1, 1));
}

#[test]
fn test_new_grid_numbers_untitled_by_history() {
    let mut editor = editor();
    editor.save(false).unwrap();
    editor.save(true).unwrap();
    let grid = editor.new_grid(None).unwrap();
    assert_eq!(grid.name(), "Untitled 3");

    let named = editor.new_grid(Some("sprite".into())).unwrap();
    assert_eq!(named.name(), "sprite");
}

// ==================== Edits ====================

#[test]
fn test_edits_persist_working_grid() {
    let mut editor = editor();
    editor.toggle(3).unwrap();
    assert_eq!(stored_current(&editor).get(3, 0), Some(true));

    editor.shift(Direction::Down).unwrap();
    assert_eq!(editor.grid().get(3, 1), Some(true));
    assert_eq!(&stored_current(&editor), editor.grid());

    editor.invert().unwrap();
    assert_eq!(editor.grid().ink_count(), 16 * 4 - 1);

    editor.clear().unwrap();
    assert_eq!(editor.grid().ink_count(), 0);
    assert_eq!(&stored_current(&editor), editor.grid());
}

#[test]
fn test_edits_keep_identity() {
    let mut editor = editor();
    let id = editor.grid().id().to_string();
    let before = editor.grid().updated_at();

    editor.invert().unwrap();
    editor.rename("renamed").unwrap();
    editor.resize(8, 8).unwrap();

    assert_eq!(editor.grid().id(), id);
    assert_eq!(editor.grid().name(), "renamed");
    assert!(editor.grid().updated_at() > before);
}

#[test]
fn test_resize_keeps_overlap() {
    let mut editor = editor();
    editor.toggle(0).unwrap();
    editor.toggle(15).unwrap();
    editor.resize(4, 2).unwrap();
    assert_eq!(editor.grid().cells(), [true, false, false, false, false, false, false, false]);
}

#[test]
fn test_resize_out_of_range_leaves_grid() {
    let mut editor = editor();
    let before = editor.grid().clone();
    for (w, h) in [(0, 4), (16, 0), (129, 4), (16, 1000)] {
        let err = editor.resize(w, h).unwrap_err();
        assert!(matches!(
            err,
            EditorError::DimensionOutOfRange { width, height } if width == w && height == h
        ));
    }
    assert_eq!(editor.grid(), &before);
    assert_eq!(stored_current(&editor), before);
}

#[test]
fn test_resize_to_limits() {
    let mut editor = editor();
    assert_eq!(editor.resize(128, 128).unwrap().len(), 128 * 128);
    assert_eq!(editor.resize(1, 1).unwrap().len(), 1);
}

#[test]
fn test_toggle_out_of_range() {
    let mut editor = editor();
    let before = editor.grid().clone();
    let err = editor.toggle(64).unwrap_err();
    assert!(matches!(err, EditorError::Grid(GridError::IndexOutOfRange { index: 64, len: 64 })));
    assert_eq!(editor.grid(), &before);
}

// ==================== Hex Import / Export ====================

#[test]
fn test_import_hex_decodes_at_current_size() {
    let mut editor = editor();
    editor
        .import_hex("0x01,0x00,\n0x00,0x80,\n0xff,0xff,\n0x00,0x00")
        .unwrap();
    let grid = editor.grid();
    assert_eq!(grid.get(0, 0), Some(true));
    assert_eq!(grid.get(15, 1), Some(true));
    assert_eq!(grid.ink_count(), 18);
    assert_eq!(
        editor.export_text(),
        "0x01,0x00,\n0x00,0x80,\n0xff,0xff,\n0x00,0x00"
    );
}

#[test]
fn test_import_hex_short_input_fills_blank() {
    let mut editor = editor();
    editor.invert().unwrap();
    editor.import_hex("ff").unwrap();
    assert_eq!(editor.grid().ink_count(), 8);
    assert_eq!((editor.grid().width(), editor.grid().height()), (16, 4));
}

#[test]
fn test_import_hex_invalid_leaves_grid() {
    let mut editor = editor();
    editor.toggle(5).unwrap();
    let before = editor.grid().clone();

    for text in ["0x01,0xZZ", "", " , ,", "0x100"] {
        let err = editor.import_hex(text).unwrap_err();
        assert!(matches!(err, EditorError::InvalidImportFormat(_)), "{text:?}");
    }
    assert_eq!(editor.grid(), &before);
    assert_eq!(stored_current(&editor), before);
}

#[test]
fn test_export_reimport_round_trip() {
    let mut editor = editor();
    editor.resize(13, 3).unwrap();
    for index in [0, 7, 8, 12, 20, 38] {
        editor.toggle(index).unwrap();
    }
    let cells = editor.grid().cells().to_vec();
    let text = editor.export_text();

    editor.clear().unwrap();
    editor.import_hex(&text).unwrap();
    assert_eq!(editor.grid().cells(), cells.as_slice());
}

// ==================== Image Import ====================

#[test]
fn test_load_image_previews_without_touching_grid() {
    let mut editor = editor();
    let before = editor.grid().clone();

    let preview = editor.load_image(&gradient_png(32, 8)).unwrap();
    assert_eq!((preview.width(), preview.height()), (32, 8));
    assert!(preview.ink_count() > 0);

    assert_eq!(editor.grid(), &before);
    assert!(editor.preview().is_some());
    assert_eq!(editor.preview_image().unwrap().dimensions(), (32, 8));
}

#[test]
fn test_load_image_downscales_to_max() {
    let mut editor = editor();
    let preview = editor.load_image(&gradient_png(512, 256)).unwrap();
    assert_eq!((preview.width(), preview.height()), (128, 64));
}

#[test]
fn test_load_image_rejects_garbage() {
    let mut editor = editor();
    let err = editor.load_image(b"not an image").unwrap_err();
    assert!(matches!(err, EditorError::ImageDecode(_)));
    assert!(editor.preview().is_none());
}

#[test]
fn test_dither_params_recompute_from_source() {
    let mut editor = editor();
    editor.load_image(&gradient_png(64, 16)).unwrap();
    let first = editor.preview().unwrap().cells().to_vec();

    let threshold = DitherParams {
        mode: DitherMode::Threshold,
        threshold: 60,
    };
    let dark = editor.set_dither_params(threshold).unwrap().unwrap().cells().to_vec();
    assert_ne!(dark, first);

    // Back to the original parameters: same preview, not a re-dither of the last result.
    let again = editor
        .set_dither_params(DitherParams::default())
        .unwrap()
        .unwrap()
        .cells()
        .to_vec();
    assert_eq!(again, first);
}

#[test]
fn test_threshold_mode_matches_gray_cutoff() {
    let mut editor = editor();
    editor
        .set_dither_params(DitherParams {
            mode: DitherMode::Threshold,
            threshold: 128,
        })
        .unwrap();
    let preview = editor.load_image(&gradient_png(16, 1)).unwrap();
    // Gray level is x * 255 / 16, below 128 for x < 9.
    let expected: Vec<bool> = (0..16).map(|x| x * 255 / 16 < 128).collect();
    assert_eq!(preview.cells(), expected.as_slice());
}

#[test]
fn test_set_dither_params_rejects_threshold_over_limit() {
    let mut editor = editor();
    let err = editor
        .set_dither_params(DitherParams {
            mode: DitherMode::Threshold,
            threshold: 201,
        })
        .unwrap_err();
    assert!(matches!(err, EditorError::ThresholdOutOfRange(201)));
    assert_eq!(editor.params(), DitherParams::default());

    assert!(
        editor
            .set_dither_params(DitherParams {
                mode: DitherMode::Threshold,
                threshold: MAX_THRESHOLD,
            })
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_confirm_image_replaces_content_keeping_identity() {
    let mut editor = editor();
    editor.rename("poster").unwrap();
    let id = editor.grid().id().to_string();

    let preview = editor.load_image(&gradient_png(20, 10)).unwrap().clone();
    let grid = editor.confirm_image().unwrap();
    assert_eq!(grid.id(), id);
    assert_eq!(grid.name(), "poster");
    assert_eq!((grid.width(), grid.height()), (20, 10));
    assert_eq!(grid.cells(), preview.cells());

    assert!(editor.preview().is_none());
    assert_eq!(stored_current(&editor).cells(), preview.cells());
}

#[test]
fn test_confirm_without_image() {
    let mut editor = editor();
    assert!(matches!(editor.confirm_image(), Err(EditorError::NoImageLoaded)));
}

#[test]
fn test_discard_image() {
    let mut editor = editor();
    let before = editor.grid().clone();
    editor.load_image(&gradient_png(8, 8)).unwrap();
    assert!(editor.discard_image());
    assert!(!editor.discard_image());
    assert!(editor.preview().is_none());
    assert_eq!(editor.grid(), &before);
}

// ==================== History ====================

#[test]
fn test_save_updates_single_history_entry() {
    let mut editor = editor();
    editor.save(false).unwrap();
    editor.toggle(1).unwrap();
    editor.save(false).unwrap();

    let history = editor.history().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id(), editor.grid().id());
    assert_eq!(history[0].get(1, 0), Some(true));
}

#[test]
fn test_save_as_copy_gets_new_identity() {
    let mut editor = editor();
    editor.rename("logo").unwrap();
    editor.save(false).unwrap();
    let original_id = editor.grid().id().to_string();
    let created_at = editor.grid().created_at();

    let copy = editor.save(true).unwrap();
    assert_ne!(copy.id(), original_id);
    assert_eq!(copy.name(), "logo copy");
    assert_eq!(copy.created_at(), created_at);

    let history = editor.history().unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|g| g.id() == original_id && g.name() == "logo"));
    assert!(history.iter().any(|g| g.name() == "logo copy"));
    assert_eq!(stored_current(&editor).name(), "logo copy");
}

#[test]
fn test_open_saved_and_not_found() {
    let mut editor = editor();
    editor.toggle(2).unwrap();
    editor.save(false).unwrap();
    let saved_id = editor.grid().id().to_string();

    editor.new_grid(None).unwrap();
    assert_ne!(editor.grid().id(), saved_id);

    let opened = editor.open_saved(&saved_id).unwrap();
    assert_eq!(opened.get(2, 0), Some(true));
    assert_eq!(stored_current(&editor).id(), saved_id);

    let err = editor.open_saved("missing").unwrap_err();
    assert!(matches!(err, EditorError::NotFound(id) if id == "missing"));
    assert_eq!(editor.grid().id(), saved_id);
}

#[test]
fn test_delete_saved_keeps_working_grid() {
    let mut editor = editor();
    editor.save(false).unwrap();
    let id = editor.grid().id().to_string();

    editor.delete_saved(&id).unwrap();
    assert!(editor.history().unwrap().is_empty());
    assert_eq!(editor.grid().id(), id);

    assert!(matches!(editor.delete_saved(&id), Err(EditorError::NotFound(_))));
}

#[test]
fn test_editor_over_database() {
    let db = grid_db::Database::open_in_memory().unwrap();
    let mut editor = Editor::open(db.clone(), &small_config()).unwrap();
    editor.toggle(0).unwrap();
    editor.save(false).unwrap();
    let id = editor.grid().id().to_string();
    drop(editor);

    let reopened = Editor::open(db, &small_config()).unwrap();
    assert_eq!(reopened.grid().id(), id);
    assert_eq!(reopened.grid().get(0, 0), Some(true));
    assert_eq!(reopened.history().unwrap().len(), 1);
}
