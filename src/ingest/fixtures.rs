/// Test fixtures: representative JSON payloads from the record store.
///
/// The store returns a bare JSON array of rows from the
/// `mediciones_hidrologicas` table, ordered most-recent-first when
/// requested with `order=ts.desc`. Derived columns (`ror`,
/// `intensidad_lluvia`, `proyeccion_30min`) are `null` on the first sample
/// of a series because the upstream processor has no predecessor to
/// difference against.

/// Three well-formed rows, newest first. Row 103 is critical (level above
/// 0.5 m with a high projection), 102 is elevated, 101 is calm with every
/// derived rate still null.
pub(crate) fn fixture_batch_json() -> &'static str {
    r#"[
      {
        "id": 103,
        "ts": "2025-11-01T14:30:25+00:00",
        "nivel_m": 0.62,
        "lluvia_mm": 18.4,
        "base_level": 0.62,
        "delta_h": -2594.78,
        "ror": 0.08,
        "intensidad_lluvia": 22.1,
        "proyeccion_30min": 0.66,
        "pendiente_hidraulica": 0.0020,
        "persistencia": 2,
        "procesado_en": "2025-11-01T14:30:26+00:00",
        "created_at": "2025-11-01T14:30:27+00:00"
      },
      {
        "id": 102,
        "ts": "2025-11-01T14:25:25+00:00",
        "nivel_m": 0.41,
        "lluvia_mm": 12.0,
        "base_level": 0.41,
        "delta_h": -2594.99,
        "ror": 0.05,
        "intensidad_lluvia": 9.3,
        "proyeccion_30min": 0.43,
        "pendiente_hidraulica": 0.0019,
        "persistencia": 0,
        "procesado_en": "2025-11-01T14:25:26+00:00",
        "created_at": "2025-11-01T14:25:27+00:00"
      },
      {
        "id": 101,
        "ts": "2025-11-01T14:20:25+00:00",
        "nivel_m": 0.20,
        "lluvia_mm": 5.1234,
        "base_level": 0.20,
        "delta_h": -2595.20,
        "ror": null,
        "intensidad_lluvia": null,
        "proyeccion_30min": null,
        "pendiente_hidraulica": 0.0018,
        "persistencia": 0,
        "procesado_en": "2025-11-01T14:20:26+00:00",
        "created_at": "2025-11-01T14:20:27+00:00"
      }
    ]"#
}

/// One row with `nivel_m` missing entirely. The ingest layer must surface
/// this as a malformed reading, never default it to zero.
pub(crate) fn fixture_malformed_row_json() -> &'static str {
    r#"[
      {
        "id": 104,
        "ts": "2025-11-01T14:35:25+00:00",
        "lluvia_mm": 18.4,
        "base_level": 0.62,
        "delta_h": -2594.78,
        "ror": 0.08,
        "intensidad_lluvia": 22.1,
        "proyeccion_30min": 0.66,
        "pendiente_hidraulica": 0.0020,
        "persistencia": 2,
        "procesado_en": "2025-11-01T14:35:26+00:00",
        "created_at": "2025-11-01T14:35:27+00:00"
      }
    ]"#
}
