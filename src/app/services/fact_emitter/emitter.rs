//! Measurement and reference-entity emission

use super::identity::IdentityAllocator;
use super::sink::{FactSink, Literal};
use crate::app::models::{Agent, GeographicPoint, Measurement, Reading};
use crate::app::vocabulary::Vocabulary;
use crate::Result;
use tracing::debug;

/// Term IRIs resolved once per emitter
#[derive(Debug, Clone)]
struct Terms {
    measurement: String,
    geographic_point: String,
    agent: String,
    located_in: String,
    measured_quality_kind: String,
    expressed_in: String,
    has_quality_value: String,
    has_begin: String,
    has_end: String,
    participated_in: String,
    latitude: String,
    longitude: String,
    comment: String,
    label: String,
}

impl Terms {
    fn new(vocabulary: &Vocabulary) -> Self {
        Self {
            measurement: vocabulary.term("doce", "Measurement"),
            geographic_point: vocabulary.term("doce", "GeographicPoint"),
            agent: vocabulary.term("doce", "Agent"),
            located_in: vocabulary.term("doce", "locatedIn"),
            measured_quality_kind: vocabulary.term("doce", "measuredQualityKind"),
            expressed_in: vocabulary.term("doce", "expressedIn"),
            has_quality_value: vocabulary.term("gufo", "hasQualityValue"),
            has_begin: vocabulary.term("gufo", "hasBeginPointInXSDDateTimeStamp"),
            has_end: vocabulary.term("gufo", "hasEndPointInXSDDateTimeStamp"),
            participated_in: vocabulary.term("gufo", "participatedIn"),
            latitude: vocabulary.term("wgs84", "lat"),
            longitude: vocabulary.term("wgs84", "long"),
            comment: vocabulary.term("rdfs", "comment"),
            label: vocabulary.term("rdfs", "label"),
        }
    }
}

/// Turns admitted readings and reference entities into sink assertions
pub struct FactEmitter<'a> {
    vocabulary: &'a Vocabulary,
    sink: &'a mut dyn FactSink,
    allocator: Box<dyn IdentityAllocator>,
    terms: Terms,
    measurements_emitted: usize,
}

impl<'a> FactEmitter<'a> {
    pub fn new(
        vocabulary: &'a Vocabulary,
        sink: &'a mut dyn FactSink,
        allocator: Box<dyn IdentityAllocator>,
    ) -> Self {
        Self {
            terms: Terms::new(vocabulary),
            vocabulary,
            sink,
            allocator,
            measurements_emitted: 0,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    pub fn measurements_emitted(&self) -> usize {
        self.measurements_emitted
    }

    /// Assert the data-provider agents every measurement refers to
    pub fn seed_well_known_entities(&mut self) -> Result<()> {
        for agent in Agent::ALL {
            let iri = self.vocabulary.agent(agent);
            self.sink.assert_class(&iri, &self.terms.agent)?;
        }
        debug!("Seeded {} agents", Agent::ALL.len());
        Ok(())
    }

    /// Assert a sampling location; returns its IRI
    pub fn emit_point(&mut self, point: &GeographicPoint) -> Result<String> {
        let iri = self.vocabulary.individual(&point.code);
        let t = &self.terms;

        self.sink.assert_class(&iri, &t.geographic_point)?;
        self.sink
            .assert_data_property(&iri, &t.latitude, &Literal::Float(point.latitude))?;
        self.sink
            .assert_data_property(&iri, &t.longitude, &Literal::Float(point.longitude))?;
        self.sink.assert_data_property(
            &iri,
            &t.comment,
            &Literal::String(point.description.clone()),
        )?;
        self.sink
            .assert_data_property(&iri, &t.label, &Literal::String(point.label.clone()))?;

        Ok(iri)
    }

    /// Emit one measurement for an admitted reading
    pub fn emit(&mut self, reading: &Reading) -> Result<Measurement> {
        let id = self.allocator.allocate(reading);
        let measurement = Measurement::from_reading(id, reading);

        let subject = self.vocabulary.individual(&measurement.id);
        let location = self.vocabulary.individual(&measurement.location);
        let quantity_kind = self.vocabulary.resolve(&measurement.quantity_kind);
        let unit = self.vocabulary.resolve(&measurement.unit);
        let agent = self.vocabulary.agent(measurement.agent);
        let t = &self.terms;

        self.sink.assert_class(&subject, &t.measurement)?;
        self.sink
            .assert_object_property(&subject, &t.located_in, &location)?;
        self.sink
            .assert_object_property(&subject, &t.measured_quality_kind, &quantity_kind)?;
        self.sink
            .assert_object_property(&subject, &t.expressed_in, &unit)?;
        self.sink.assert_data_property(
            &subject,
            &t.has_quality_value,
            &Literal::Double(measurement.value),
        )?;
        self.sink.assert_data_property(
            &subject,
            &t.has_begin,
            &Literal::DateTimeStamp(measurement.interval.begin),
        )?;
        self.sink.assert_data_property(
            &subject,
            &t.has_end,
            &Literal::DateTimeStamp(measurement.interval.end),
        )?;
        self.sink
            .assert_object_property(&agent, &t.participated_in, &subject)?;

        self.measurements_emitted += 1;
        Ok(measurement)
    }

    /// Commit the underlying sink
    pub fn commit(&mut self) -> Result<()> {
        self.sink.commit()
    }
}
