//! Tests for point catalogue parsing and the location registry


pub const RENOVA_POINTS: &str = "\
MONITORAMENTO;CODIGO_PONTO;NOME_PONTO;DESCRICAO_PONTO;TIPO_ESTACAO;LONGITUDE;LATITUTE
Aguas Interiores;RCA-01;Acaiaca - Carmo 01;Ponte férrea sobre o rio do Carmo;Manual;-43,1127;-20,3471
Aguas Interiores;EBN 01;Estação Barra Nova;\"Foz; margem esquerda\";Automatica;-39,740729;-18,953517
Aguas Interiores;RCA-01;Repetido;Repetido;Manual;-43,1127;-20,3471
Aguas Interiores;RVD-03;Mariana - Dique S3;Sem coordenada;Manual;;-20,1
";

pub const UNESP_POINTS: &str = "\
ID amostras;Referência;Coordenada Geográfica (UTM);;Data
M2;Rio Gualaxo do Norte em Bento Rodrigues;-20,27638884;-43,43115158;30/04/16
M 5;Rio do Carmo;-20,2;-43,1;30/04/16
";
