//! Test fixtures: representative XML documents from the AHPS hydrograph API.
//!
//! These fixtures are structurally complete but truncated to the minimum
//! needed to exercise the parser. They reflect the real document returned by:
//!   https://water.weather.gov/ahps2/hydrograph_to_xml.php?output=xml&gage=...
//!
//! AHPS document shape:
//!   site@id, @name, @timezone, @originator, @generationtime
//!     disclaimers/{AHPSXMLversion,status,quality,observed,general,standing}
//!     sigstages/{low,action,bankfull,flood,moderate,major,record}@units
//!                                   - threshold as element TEXT, may be empty
//!     sigflows/…                    - same vocabulary, mostly empty
//!     zerodatum@units
//!     rating@dignity / alt_rating   - datum@stage,@stageUnits,@flow,@flowUnits
//!     observed/datum[]              - most recent FIRST
//!     forecast@issued,@timezone/datum[] - chronological
//!       .valid@timezone   - `YYYY-MM-DDTHH:MM:SS±HH:MM`, usually `-00:00`
//!       .primary@name,@units   - stage as TEXT
//!       .secondary@name,@units - flow as TEXT, `-999` when missing
//!       .pedts            - SHEF code, e.g. HGIRG
//!
//! Note: every number except the rating table is element text, not an
//! attribute. Parsers must handle blanks there.

/// Baton Rouge (BTRL1), December 2021. Latest stage 7.67 ft at
/// 16:00 UTC (10:00 CST) is well below action stage (27 ft). `low` and
/// `bankfull` are published empty. The forecast crest is 8.40 ft, reached
/// twice; the first occurrence is 2021-12-17 12:00 UTC.
///
/// The same document backs the integration tests in `tests/`.
#[cfg(test)]
pub(crate) fn fixture_btrl1_xml() -> &'static str {
    include_str!("../../tests/data/btrl1.xml")
}

/// Forecast-only document: the `<observed>` section is absent.
#[cfg(test)]
pub(crate) fn fixture_no_observed_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<site timezone="CST" originator="NCRFC" name="Illinois River at Peoria" id="PKIN2" generationtime="2024-05-01T17:00:00-00:00">
  <sigstages>
    <low units="ft"></low>
    <action units="ft">16.00</action>
    <bankfull units="ft"></bankfull>
    <flood units="ft">18.00</flood>
    <moderate units="ft">22.00</moderate>
    <major units="ft">24.00</major>
    <record units="ft">29.35</record>
  </sigstages>
  <forecast timezone="UTC" issued="2024-05-01T14:30:00-00:00">
    <datum>
      <valid timezone="UTC">2024-05-02T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">18.90</primary>
      <pedts>HGIFF</pedts>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-03T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">19.40</primary>
      <pedts>HGIFF</pedts>
    </datum>
  </forecast>
</site>"#
}

/// Observed-only document whose first secondary is text and whose second
/// datum has no secondary at all.
#[cfg(test)]
pub(crate) fn fixture_textual_secondary_xml() -> &'static str {
    r#"<site name="Illinois River at Kingston Mines" id="KGMI2">
  <observed>
    <datum>
      <valid timezone="UTC">2024-05-01T17:00:00-00:00</valid>
      <primary name="Stage" units="ft">18.42</primary>
      <secondary name="Flow" units="kcfs">N/A</secondary>
      <pedts>HGIRG</pedts>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-01T16:00:00-00:00</valid>
      <primary name="Stage" units="ft">18.40</primary>
      <pedts>HGIRG</pedts>
    </datum>
  </observed>
</site>"#
}

/// Second observation carries `N/A` as its primary reading.
#[cfg(test)]
pub(crate) fn fixture_non_numeric_primary_xml() -> &'static str {
    r#"<site name="Illinois River at Kingston Mines" id="KGMI2">
  <sigstages>
    <action units="ft">14.00</action>
    <flood units="ft">16.00</flood>
  </sigstages>
  <observed>
    <datum>
      <valid timezone="UTC">2024-05-01T17:00:00-00:00</valid>
      <primary name="Stage" units="ft">18.42</primary>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-01T16:00:00-00:00</valid>
      <primary name="Stage" units="ft">N/A</primary>
    </datum>
  </observed>
</site>"#
}

/// Flood stage published as prose instead of a number.
#[cfg(test)]
pub(crate) fn fixture_non_numeric_threshold_xml() -> &'static str {
    r#"<site name="Mississippi River at Baton Rouge" id="BTRL1">
  <sigstages>
    <action units="ft">27.00</action>
    <flood units="ft">minor flooding</flood>
  </sigstages>
  <observed>
    <datum>
      <valid timezone="UTC">2021-12-14T16:00:00-00:00</valid>
      <primary name="Stage" units="ft">7.67</primary>
    </datum>
  </observed>
</site>"#
}

/// Timestamp written with a `Z` suffix instead of a numeric offset.
#[cfg(test)]
pub(crate) fn fixture_zulu_timestamp_xml() -> &'static str {
    r#"<site name="Mississippi River at Baton Rouge" id="BTRL1">
  <observed>
    <datum>
      <valid timezone="UTC">2021-12-14T16:00:00Z</valid>
      <primary name="Stage" units="ft">7.67</primary>
    </datum>
  </observed>
</site>"#
}

/// Observations published oldest first, violating the producer contract.
/// Values 5.0, 5.2, 5.4 ft at 14:00, 15:00, 16:00 CST.
#[cfg(test)]
pub(crate) fn fixture_oldest_first_xml() -> &'static str {
    r#"<site name="Illinois River at Henry" id="HNYI2">
  <observed>
    <datum>
      <valid timezone="CST">2024-05-01T14:00:00-06:00</valid>
      <primary name="Stage" units="ft">5.00</primary>
    </datum>
    <datum>
      <valid timezone="CST">2024-05-01T15:00:00-06:00</valid>
      <primary name="Stage" units="ft">5.20</primary>
    </datum>
    <datum>
      <valid timezone="CST">2024-05-01T16:00:00-06:00</valid>
      <primary name="Stage" units="ft">5.40</primary>
    </datum>
  </observed>
</site>"#
}

/// Forecast of 3.0, 5.0, 5.0, 2.0 ft on consecutive days; the crest value
/// appears twice.
#[cfg(test)]
pub(crate) fn fixture_tied_crest_xml() -> &'static str {
    r#"<site name="Illinois River at Havana" id="HAVI2">
  <forecast timezone="UTC" issued="2024-05-01T14:30:00-00:00">
    <datum>
      <valid timezone="UTC">2024-05-02T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">3.00</primary>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-03T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">5.00</primary>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-04T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">5.00</primary>
    </datum>
    <datum>
      <valid timezone="UTC">2024-05-05T12:00:00-00:00</valid>
      <primary name="Stage" units="ft">2.00</primary>
    </datum>
  </forecast>
</site>"#
}
